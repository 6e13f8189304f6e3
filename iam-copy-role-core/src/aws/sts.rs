use async_trait::async_trait;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client as StsClient;

use crate::aws::{AwsError, AwsResult};
use crate::types::CredentialBundle;

/// Security token service operations used to reach the destination account
#[async_trait]
pub trait StsApi: Send + Sync {
    async fn assume_role(&self, role_arn: &str, session_name: &str)
        -> AwsResult<CredentialBundle>;
}

pub struct AwsStsClient {
    client: StsClient,
}

impl AwsStsClient {
    pub fn new(client: StsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StsApi for AwsStsClient {
    /// Exchange `role_arn` for temporary credentials using STS AssumeRole.
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
    ) -> AwsResult<CredentialBundle> {
        let out = self
            .client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .send()
            .await
            .map_err(|e| {
                AwsError::StsError(format!(
                    "STS AssumeRole failed: {}",
                    DisplayErrorContext(e)
                ))
            })?;

        let creds = out
            .credentials()
            .ok_or_else(|| AwsError::StsError("STS AssumeRole returned no credentials".to_string()))?;

        Ok(CredentialBundle {
            access_key_id: creds.access_key_id().to_string(),
            secret_access_key: creds.secret_access_key().to_string(),
            session_token: creds.session_token().to_string(),
        })
    }
}
