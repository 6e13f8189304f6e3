//! AWS SDK integration: IAM and STS seams, their SDK backed clients, client construction.

pub mod client_provider;
pub mod iam_client;
#[cfg(test)]
pub(crate) mod mock;
pub mod sts;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AwsError {
    #[error("AWS configuration error: {0}")]
    ConfigError(String),
    #[error("IAM client error: {0}")]
    IamError(String),
    #[error("STS client error: {0}")]
    StsError(String),
    #[error("Policy document error: {0}")]
    PolicyError(String),
}

pub type AwsResult<T> = Result<T, AwsError>;
