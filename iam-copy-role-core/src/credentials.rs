//! Credential resolution for the source and destination clients.

use log::{debug, info};

use crate::aws::client_provider::ClientProvider;
use crate::aws::sts::StsApi;
use crate::error::{CopyRoleError, CopyRoleResult};
use crate::types::CredentialBundle;

const SESSION_NAME_PREFIX: &str = "aws-iam-copy-role";

/// STS session name for a given timestamp in milliseconds
pub fn session_name_at(unix_millis: i64) -> String {
    format!("{SESSION_NAME_PREFIX}-{unix_millis}")
}

/// Fail with `MissingCredentials` unless ambient credentials are discoverable.
pub async fn resolve_ambient_credentials<P>(provider: &P) -> CopyRoleResult<()>
where
    P: ClientProvider + ?Sized,
{
    provider.check_ambient_credentials().await.map_err(|e| {
        debug!("Ambient credential check failed: {}", e);
        CopyRoleError::MissingCredentials
    })
}

/// Exchange `role_arn` for temporary credentials.
///
/// Session names are only unique to the millisecond, which is enough for auditing.
pub async fn assume_role<S>(sts: &S, role_arn: &str) -> CopyRoleResult<CredentialBundle>
where
    S: StsApi + ?Sized,
{
    let session_name = session_name_at(chrono::Utc::now().timestamp_millis());
    debug!("Assuming {} with session name {}", role_arn, session_name);

    let credentials = sts
        .assume_role(role_arn, &session_name)
        .await
        .map_err(|source| CopyRoleError::AssumeRoleFailed {
            arn: role_arn.to_string(),
            source,
        })?;

    info!("Assumed role {}", role_arn);
    Ok(credentials)
}

/// Credentials for the destination client: `None` keeps the ambient credentials.
pub async fn get_credentials<S>(
    sts: &S,
    role_to_assume: Option<&str>,
) -> CopyRoleResult<Option<CredentialBundle>>
where
    S: StsApi + ?Sized,
{
    match role_to_assume {
        Some(arn) => assume_role(sts, arn).await.map(Some),
        None => Ok(None),
    }
}
