//! Construction of the source, STS and destination clients.
//!
//! The orchestrator only sees [`ClientProvider`]; [`SdkClientProvider`] builds real AWS SDK
//! clients from the default credential and region chain.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::Client as IamClient;
use aws_sdk_sts::Client as StsClient;
use log::{debug, info};

use crate::aws::iam_client::{AwsIamClient, IamApi};
use crate::aws::sts::{AwsStsClient, StsApi};
use crate::aws::{AwsError, AwsResult};
use crate::types::CredentialBundle;

/// Region used when neither `--region` nor the ambient chain provides one. IAM is global.
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

const ASSUMED_CREDENTIALS_PROVIDER: &str = "iam-copy-role-assumed";

/// Source of the API clients used during a copy
#[async_trait]
pub trait ClientProvider: Send + Sync {
    type Iam: IamApi;
    type Sts: StsApi;

    /// Succeeds when ambient credentials can be discovered. Never calls IAM.
    ///
    /// The SDK implementation resolves the default chain rather than inspecting it, so a
    /// profile backed by IMDS, SSO or an STS `role_arn` may go over the network here.
    async fn check_ambient_credentials(&self) -> AwsResult<()>;

    /// IAM client for the source role, always on ambient credentials
    fn source_iam(&self) -> Self::Iam;

    /// STS client used for the role assumption, on ambient credentials
    fn sts(&self) -> Self::Sts;

    /// IAM client for the target role; `None` means ambient credentials.
    fn destination_iam(&self, credentials: Option<&CredentialBundle>) -> Self::Iam;
}

/// Settings applied on top of the ambient AWS configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub region: Option<String>,
}

pub struct SdkClientProvider {
    config: SdkConfig,
}

impl SdkClientProvider {
    /// Load the AWS configuration using the standard credential provider chain.
    pub async fn load(options: &ClientOptions) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &options.region {
            loader = loader.region(Region::new(region.clone()));
        }
        Self::from_config(loader.load().await)
    }

    pub fn from_config(config: SdkConfig) -> Self {
        let config = match config.region() {
            Some(region) => {
                debug!("Using region: {}", region);
                config
            }
            None => {
                info!("No region configured, using default {}", DEFAULT_AWS_REGION);
                config
                    .into_builder()
                    .region(Region::new(DEFAULT_AWS_REGION))
                    .build()
            }
        };
        Self { config }
    }

    fn iam_config(&self, credentials: Option<&CredentialBundle>) -> aws_sdk_iam::Config {
        let builder = aws_sdk_iam::config::Builder::from(&self.config);
        match credentials {
            Some(bundle) => builder
                .credentials_provider(Credentials::new(
                    bundle.access_key_id.clone(),
                    bundle.secret_access_key.clone(),
                    Some(bundle.session_token.clone()),
                    None,
                    ASSUMED_CREDENTIALS_PROVIDER,
                ))
                .build(),
            None => builder.build(),
        }
    }
}

#[async_trait]
impl ClientProvider for SdkClientProvider {
    type Iam = AwsIamClient;
    type Sts = AwsStsClient;

    async fn check_ambient_credentials(&self) -> AwsResult<()> {
        let provider = self.config.credentials_provider().ok_or_else(|| {
            AwsError::ConfigError("no credentials provider configured".to_string())
        })?;

        provider
            .provide_credentials()
            .await
            .map(|_| ())
            .map_err(|e| AwsError::ConfigError(DisplayErrorContext(e).to_string()))
    }

    fn source_iam(&self) -> AwsIamClient {
        AwsIamClient::new(IamClient::from_conf(self.iam_config(None)))
    }

    fn sts(&self) -> AwsStsClient {
        AwsStsClient::new(StsClient::new(&self.config))
    }

    fn destination_iam(&self, credentials: Option<&CredentialBundle>) -> AwsIamClient {
        AwsIamClient::new(IamClient::from_conf(self.iam_config(credentials)))
    }
}
