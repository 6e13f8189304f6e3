//! Error types for the role copy pipeline.
//!
//! Every remote failure is wrapped by the step that issued the call, so the rendered
//! message always names what was being read or written.

use std::fmt;

use thiserror::Error;

use crate::aws::AwsError;

/// Which paginated listing was running when a `PolicyListFailed` occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyListing {
    InlinePolicyNames,
    ManagedPolicies,
}

impl fmt::Display for PolicyListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyListing::InlinePolicyNames => f.write_str("inline policy names"),
            PolicyListing::ManagedPolicies => f.write_str("managed policies"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CopyRoleError {
    /// Malformed or missing command-line arguments.
    #[error("{0}")]
    Usage(String),

    /// No ambient credentials for the source client.
    #[error("Failed to find AWS credentials. Consider providing them with environment variables.")]
    MissingCredentials,

    #[error("Failed to assume role {arn}: \"{source}\"")]
    AssumeRoleFailed {
        arn: String,
        #[source]
        source: AwsError,
    },

    #[error("Failed to fetch source role {role_name}: \"{source}\"")]
    RoleFetchFailed {
        role_name: String,
        #[source]
        source: AwsError,
    },

    #[error("Failed to fetch {listing} for {role_name}: \"{source}\"")]
    PolicyListFailed {
        role_name: String,
        listing: PolicyListing,
        #[source]
        source: AwsError,
    },

    #[error("Failed to fetch inline policy {policy_name}: \"{source}\"")]
    PolicyFetchFailed {
        policy_name: String,
        #[source]
        source: AwsError,
    },

    #[error("Failed to create target role {target_name}: \"{source}\"")]
    RoleCreateFailed {
        target_name: String,
        #[source]
        source: AwsError,
    },

    #[error("Failed to add policy {policy_identifier}: \"{source}\"")]
    PolicyAttachFailed {
        policy_identifier: String,
        #[source]
        source: AwsError,
    },
}

impl CopyRoleError {
    /// Process exit code for this failure; usage errors follow the clap convention.
    pub fn exit_code(&self) -> u8 {
        match self {
            CopyRoleError::Usage(_) => 2,
            _ => 1,
        }
    }

    /// Whether the failure happened after the target role was created
    pub fn leaves_partial_target(&self) -> bool {
        matches!(self, CopyRoleError::PolicyAttachFailed { .. })
    }
}

pub type CopyRoleResult<T> = Result<T, CopyRoleError>;
