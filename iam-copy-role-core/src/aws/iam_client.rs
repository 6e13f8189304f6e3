//! IAM operations used by the role copy, and their AWS SDK implementation

use async_trait::async_trait;
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::types::Tag as IamTag;
use aws_sdk_iam::Client as IamClient;

use crate::aws::{AwsError, AwsResult};
use crate::types::{
    InlinePolicy, ManagedPolicyRef, Page, RemoteInlinePolicy, RemoteRole, RoleSpec, Tag,
};

/// The slice of the IAM API the reader and writer depend on.
///
/// Documents are passed through untouched: reads return what the service returns
/// (URL-encoded), writes send what they are given.
#[async_trait]
pub trait IamApi: Send + Sync {
    async fn get_role(&self, role_name: &str) -> AwsResult<RemoteRole>;

    async fn list_role_policies(
        &self,
        role_name: &str,
        marker: Option<String>,
    ) -> AwsResult<Page<String>>;

    async fn get_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> AwsResult<RemoteInlinePolicy>;

    async fn list_attached_role_policies(
        &self,
        role_name: &str,
        marker: Option<String>,
    ) -> AwsResult<Page<ManagedPolicyRef>>;

    /// Create `role_name` from `spec`; returns the new role ARN when the service reports it.
    async fn create_role(&self, role_name: &str, spec: &RoleSpec) -> AwsResult<Option<String>>;

    async fn put_role_policy(&self, role_name: &str, policy: &InlinePolicy) -> AwsResult<()>;

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> AwsResult<()>;
}

pub struct AwsIamClient {
    client: IamClient,
}

impl AwsIamClient {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }
}

fn iam_error<E>(context: &str, err: E) -> AwsError
where
    E: std::error::Error,
{
    AwsError::IamError(format!("{context}: {}", DisplayErrorContext(err)))
}

#[async_trait]
impl IamApi for AwsIamClient {
    async fn get_role(&self, role_name: &str) -> AwsResult<RemoteRole> {
        let response = self
            .client
            .get_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| iam_error(&format!("GetRole '{role_name}' failed"), e))?;

        let role = response.role().ok_or_else(|| {
            AwsError::IamError(format!("GetRole '{role_name}' returned no role"))
        })?;

        Ok(RemoteRole {
            path: role.path().to_string(),
            role_name: role.role_name().to_string(),
            arn: role.arn().to_string(),
            assume_role_policy_document: role.assume_role_policy_document().map(str::to_string),
            description: role.description().map(str::to_string),
            max_session_duration: role.max_session_duration(),
            permissions_boundary_arn: role
                .permissions_boundary()
                .and_then(|boundary| boundary.permissions_boundary_arn())
                .map(str::to_string),
            tags: role
                .tags()
                .iter()
                .map(|tag| Tag::new(tag.key(), tag.value()))
                .collect(),
        })
    }

    async fn list_role_policies(
        &self,
        role_name: &str,
        marker: Option<String>,
    ) -> AwsResult<Page<String>> {
        let response = self
            .client
            .list_role_policies()
            .role_name(role_name)
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| iam_error(&format!("ListRolePolicies '{role_name}' failed"), e))?;

        Ok(Page {
            items: response.policy_names,
            marker: response.marker,
            is_truncated: response.is_truncated,
        })
    }

    async fn get_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> AwsResult<RemoteInlinePolicy> {
        let response = self
            .client
            .get_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .send()
            .await
            .map_err(|e| {
                iam_error(
                    &format!("GetRolePolicy '{policy_name}' on role '{role_name}' failed"),
                    e,
                )
            })?;

        Ok(RemoteInlinePolicy {
            policy_name: response.policy_name,
            policy_document: response.policy_document,
        })
    }

    async fn list_attached_role_policies(
        &self,
        role_name: &str,
        marker: Option<String>,
    ) -> AwsResult<Page<ManagedPolicyRef>> {
        let response = self
            .client
            .list_attached_role_policies()
            .role_name(role_name)
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| {
                iam_error(
                    &format!("ListAttachedRolePolicies '{role_name}' failed"),
                    e,
                )
            })?;

        let items = response
            .attached_policies()
            .iter()
            .filter_map(|policy| {
                let arn = policy.policy_arn()?;
                Some(ManagedPolicyRef::new(
                    arn,
                    policy.policy_name().unwrap_or_default(),
                ))
            })
            .collect();

        Ok(Page {
            items,
            marker: response.marker().map(str::to_string),
            is_truncated: response.is_truncated(),
        })
    }

    async fn create_role(&self, role_name: &str, spec: &RoleSpec) -> AwsResult<Option<String>> {
        let tags = spec
            .tags
            .iter()
            .map(|tag| {
                IamTag::builder()
                    .key(&tag.key)
                    .value(&tag.value)
                    .build()
                    .map_err(|e| AwsError::IamError(format!("Invalid tag '{}': {e}", tag.key)))
            })
            .collect::<AwsResult<Vec<_>>>()?;

        let response = self
            .client
            .create_role()
            .path(&spec.path)
            .role_name(role_name)
            .assume_role_policy_document(&spec.assume_role_policy_document)
            .set_description(spec.description.clone())
            .set_max_session_duration(spec.max_session_duration)
            .set_permissions_boundary(spec.permissions_boundary_arn.clone())
            .set_tags((!tags.is_empty()).then_some(tags))
            .send()
            .await
            .map_err(|e| iam_error(&format!("CreateRole '{role_name}' failed"), e))?;

        Ok(response.role().map(|role| role.arn().to_string()))
    }

    async fn put_role_policy(&self, role_name: &str, policy: &InlinePolicy) -> AwsResult<()> {
        self.client
            .put_role_policy()
            .role_name(role_name)
            .policy_name(&policy.name)
            .policy_document(&policy.document)
            .send()
            .await
            .map_err(|e| {
                iam_error(
                    &format!(
                        "PutRolePolicy '{}' on role '{role_name}' failed",
                        policy.name
                    ),
                    e,
                )
            })?;
        Ok(())
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> AwsResult<()> {
        self.client
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| {
                iam_error(
                    &format!("AttachRolePolicy '{policy_arn}' on role '{role_name}' failed"),
                    e,
                )
            })?;
        Ok(())
    }
}
