//! This crate provides the core logic of iam-copy-role:
//! - Marker based pagination over IAM listings
//! - Credential resolution, including STS role assumption for the destination
//! - Reading a role with its inline and managed policies, and re-creating it elsewhere
//!

mod aws;
pub mod commands;
pub mod credentials;
mod error;
pub mod pagination;
pub mod reader;
mod types;
pub mod writer;

// Re-exports for a small, focused public API
pub use aws::client_provider::{ClientOptions, ClientProvider, SdkClientProvider, DEFAULT_AWS_REGION};
pub use aws::iam_client::{AwsIamClient, IamApi};
pub use aws::sts::{AwsStsClient, StsApi};
pub use aws::{AwsError, AwsResult};
pub use commands::{CopyStage, RoleCopyService};
pub use error::{CopyRoleError, CopyRoleResult, PolicyListing};
pub use types::{
    CopyReport, CopyRoleArgs, CredentialBundle, InlinePolicy, ManagedPolicyRef, Page,
    RemoteInlinePolicy, RemoteRole, RoleSnapshot, RoleSpec, Tag,
};
