//! Data model shared by the reader, the writer and the orchestrator.

use std::fmt;

use serde::Serialize;

use crate::error::{CopyRoleError, CopyRoleResult};

/// Command-line arguments of a copy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRoleArgs {
    pub source_role_name: String,
    pub target_role_name: String,
    pub role_to_assume_arn: Option<String>,
}

impl CopyRoleArgs {
    /// Build arguments, rejecting empty role names.
    pub fn new(
        source_role_name: impl Into<String>,
        target_role_name: impl Into<String>,
        role_to_assume_arn: Option<String>,
    ) -> CopyRoleResult<Self> {
        let source_role_name = source_role_name.into();
        let target_role_name = target_role_name.into();

        if source_role_name.trim().is_empty() {
            return Err(CopyRoleError::Usage(
                "SOURCE_ROLE_NAME must not be empty".to_string(),
            ));
        }
        if target_role_name.trim().is_empty() {
            return Err(CopyRoleError::Usage(
                "TARGET_ROLE_NAME must not be empty".to_string(),
            ));
        }

        Ok(Self {
            source_role_name,
            target_role_name,
            role_to_assume_arn: role_to_assume_arn.filter(|arn| !arn.trim().is_empty()),
        })
    }
}

/// One page of a paginated IAM listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub marker: Option<String>,
    pub is_truncated: bool,
}

impl<T> Page<T> {
    /// Final page of a listing
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            marker: None,
            is_truncated: false,
        }
    }

    /// Truncated page that continues at `marker`
    pub fn truncated(items: Vec<T>, marker: impl Into<String>) -> Self {
        Self {
            items,
            marker: Some(marker.into()),
            is_truncated: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Role metadata as returned by GetRole. The trust policy is still URL-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteRole {
    pub path: String,
    pub role_name: String,
    pub arn: String,
    pub assume_role_policy_document: Option<String>,
    pub description: Option<String>,
    pub max_session_duration: Option<i32>,
    pub permissions_boundary_arn: Option<String>,
    pub tags: Vec<Tag>,
}

/// Inline policy as returned by GetRolePolicy. The document is still URL-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInlinePolicy {
    pub policy_name: String,
    pub policy_document: String,
}

/// Captured source role, used as the template for the target role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleSpec {
    pub path: String,
    pub name: String,
    pub arn: String,
    pub assume_role_policy_document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_session_duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions_boundary_arn: Option<String>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InlinePolicy {
    pub name: String,
    pub document: String,
}

impl InlinePolicy {
    pub fn new(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: document.into(),
        }
    }
}

/// Reference to a managed policy attached to a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagedPolicyRef {
    pub policy_arn: String,
    pub policy_name: String,
}

impl ManagedPolicyRef {
    pub fn new(policy_arn: impl Into<String>, policy_name: impl Into<String>) -> Self {
        Self {
            policy_arn: policy_arn.into(),
            policy_name: policy_name.into(),
        }
    }
}

/// Everything read from the source role before anything is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleSnapshot {
    pub role: RoleSpec,
    pub inline_policies: Vec<InlinePolicy>,
    pub managed_policies: Vec<ManagedPolicyRef>,
}

/// Temporary credentials obtained from STS AssumeRole.
///
/// `None` in an `Option<CredentialBundle>` means the ambient credentials are used.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .finish()
    }
}

/// Summary of a successful copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CopyReport {
    pub source_role: String,
    pub target_role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumed_role_arn: Option<String>,
    pub inline_policies: Vec<String>,
    pub managed_policies: Vec<String>,
}
