//! Reads the complete policy set of the source role.
//!
//! All calls go to the source client, one at a time, and the first failure aborts the read.

use log::{debug, info};

use crate::aws::iam_client::IamApi;
use crate::aws::{AwsError, AwsResult};
use crate::commands::CopyStage;
use crate::error::{CopyRoleError, CopyRoleResult, PolicyListing};
use crate::pagination::collect_pages;
use crate::types::{InlinePolicy, ManagedPolicyRef, RoleSnapshot, RoleSpec};

/// URL decode a policy document (IAM returns URL-encoded JSON)
pub fn decode_policy_document(encoded: &str) -> AwsResult<String> {
    percent_encoding::percent_decode_str(encoded)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| AwsError::PolicyError(format!("Failed to URL decode policy document: {e}")))
}

pub struct RoleReader<'a, C: IamApi + ?Sized> {
    client: &'a C,
}

impl<'a, C: IamApi + ?Sized> RoleReader<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub async fn fetch_role(&self, role_name: &str) -> CopyRoleResult<RoleSpec> {
        info!("Fetching source role {}...", role_name);
        let fetch_failed = |source: AwsError| CopyRoleError::RoleFetchFailed {
            role_name: role_name.to_string(),
            source,
        };

        let role = self.client.get_role(role_name).await.map_err(fetch_failed)?;
        let encoded = role.assume_role_policy_document.ok_or_else(|| {
            fetch_failed(AwsError::PolicyError(
                "role has no assume role policy document".to_string(),
            ))
        })?;
        let assume_role_policy_document = decode_policy_document(&encoded).map_err(fetch_failed)?;

        info!("Source role loaded.");
        Ok(RoleSpec {
            path: role.path,
            name: role.role_name,
            arn: role.arn,
            assume_role_policy_document,
            description: role.description,
            max_session_duration: role.max_session_duration,
            permissions_boundary_arn: role.permissions_boundary_arn,
            tags: role.tags,
        })
    }

    pub async fn fetch_inline_policy_names(&self, role_name: &str) -> CopyRoleResult<Vec<String>> {
        info!("Fetching inline policy names for {}...", role_name);
        let client = self.client;
        let names = collect_pages(move |marker| client.list_role_policies(role_name, marker))
            .await
            .map_err(|source| CopyRoleError::PolicyListFailed {
                role_name: role_name.to_string(),
                listing: PolicyListing::InlinePolicyNames,
                source,
            })?;
        info!("Loaded {} inline policy names.", names.len());
        Ok(names)
    }

    /// Fetch and decode every named inline policy, in order. Any failure discards the rest.
    pub async fn fetch_inline_policy_bodies(
        &self,
        role_name: &str,
        names: &[String],
    ) -> CopyRoleResult<Vec<InlinePolicy>> {
        info!("Fetching inline policies...");
        let mut policies = Vec::with_capacity(names.len());

        for name in names {
            let fetch_failed = |source: AwsError| CopyRoleError::PolicyFetchFailed {
                policy_name: name.clone(),
                source,
            };
            let policy = self
                .client
                .get_role_policy(role_name, name)
                .await
                .map_err(fetch_failed)?;
            let document = decode_policy_document(&policy.policy_document).map_err(fetch_failed)?;
            debug!("Loaded inline policy {}", policy.policy_name);
            policies.push(InlinePolicy::new(policy.policy_name, document));
        }

        info!("Loaded inline policies.");
        Ok(policies)
    }

    pub async fn fetch_inline_policies(&self, role_name: &str) -> CopyRoleResult<Vec<InlinePolicy>> {
        let names = self.fetch_inline_policy_names(role_name).await?;
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_inline_policy_bodies(role_name, &names).await
    }

    pub async fn fetch_managed_policies(
        &self,
        role_name: &str,
    ) -> CopyRoleResult<Vec<ManagedPolicyRef>> {
        info!("Fetching managed policies for {}...", role_name);
        let client = self.client;
        let policies =
            collect_pages(move |marker| client.list_attached_role_policies(role_name, marker))
                .await
                .map_err(|source| CopyRoleError::PolicyListFailed {
                    role_name: role_name.to_string(),
                    listing: PolicyListing::ManagedPolicies,
                    source,
                })?;
        info!("Loaded {} managed policies.", policies.len());
        Ok(policies)
    }

    /// Role, inline policies, then managed policies. `on_stage` hears about each step before it runs.
    pub async fn read_snapshot(
        &self,
        role_name: &str,
        mut on_stage: impl FnMut(CopyStage),
    ) -> CopyRoleResult<RoleSnapshot> {
        on_stage(CopyStage::ReadRole);
        let role = self.fetch_role(role_name).await?;
        on_stage(CopyStage::ReadInlinePolicies);
        let inline_policies = self.fetch_inline_policies(role_name).await?;
        on_stage(CopyStage::ReadManagedPolicies);
        let managed_policies = self.fetch_managed_policies(role_name).await?;
        Ok(RoleSnapshot {
            role,
            inline_policies,
            managed_policies,
        })
    }
}
