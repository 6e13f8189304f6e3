//! Re-creates a captured role on the destination client.
//!
//! Attachments run one at a time and stop at the first failure. Nothing is rolled back, so a
//! failure after `create_role` leaves the target role with a partial policy set.

use log::{debug, info};

use crate::aws::iam_client::IamApi;
use crate::commands::CopyStage;
use crate::error::{CopyRoleError, CopyRoleResult};
use crate::types::{InlinePolicy, ManagedPolicyRef, RoleSnapshot, RoleSpec};

pub struct RoleWriter<'a, C: IamApi + ?Sized> {
    client: &'a C,
}

impl<'a, C: IamApi + ?Sized> RoleWriter<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Create `target_name` from `spec`. Returns the ARN of the new role when known.
    pub async fn create_role(
        &self,
        spec: &RoleSpec,
        target_name: &str,
    ) -> CopyRoleResult<Option<String>> {
        info!("Creating a new role {}...", target_name);
        let arn = self
            .client
            .create_role(target_name, spec)
            .await
            .map_err(|source| CopyRoleError::RoleCreateFailed {
                target_name: target_name.to_string(),
                source,
            })?;
        info!("Created role {}.", target_name);
        Ok(arn)
    }

    pub async fn attach_inline_policies(
        &self,
        target_name: &str,
        policies: &[InlinePolicy],
    ) -> CopyRoleResult<()> {
        info!("Adding inline policies to {}...", target_name);
        for policy in policies {
            self.client
                .put_role_policy(target_name, policy)
                .await
                .map_err(|source| CopyRoleError::PolicyAttachFailed {
                    policy_identifier: policy.name.clone(),
                    source,
                })?;
            debug!("Put inline policy {}", policy.name);
        }
        info!("Added {} inline policies.", policies.len());
        Ok(())
    }

    pub async fn attach_managed_policies(
        &self,
        target_name: &str,
        policies: &[ManagedPolicyRef],
    ) -> CopyRoleResult<()> {
        info!("Adding managed policies to {}...", target_name);
        for policy in policies {
            self.client
                .attach_role_policy(target_name, &policy.policy_arn)
                .await
                .map_err(|source| CopyRoleError::PolicyAttachFailed {
                    policy_identifier: policy.policy_arn.clone(),
                    source,
                })?;
            debug!("Attached managed policy {}", policy.policy_arn);
        }
        info!("Added {} managed policies.", policies.len());
        Ok(())
    }

    /// Create the role, then its inline and managed policies. Empty sets issue no calls and
    /// are not reported to `on_stage`.
    pub async fn write_snapshot(
        &self,
        snapshot: &RoleSnapshot,
        target_name: &str,
        mut on_stage: impl FnMut(CopyStage),
    ) -> CopyRoleResult<Option<String>> {
        on_stage(CopyStage::CreateRole);
        let arn = self.create_role(&snapshot.role, target_name).await?;
        if !snapshot.inline_policies.is_empty() {
            on_stage(CopyStage::WriteInlinePolicies);
            self.attach_inline_policies(target_name, &snapshot.inline_policies)
                .await?;
        }
        if !snapshot.managed_policies.is_empty() {
            on_stage(CopyStage::WriteManagedPolicies);
            self.attach_managed_policies(target_name, &snapshot.managed_policies)
                .await?;
        }
        Ok(arn)
    }
}
