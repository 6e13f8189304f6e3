//! Role copy service layer
//!
//! The service owns the client provider and exposes the copy operation to the CLI. Tests
//! build it from an in-memory provider, the CLI from the AWS SDK one.

use crate::aws::client_provider::{ClientOptions, ClientProvider, SdkClientProvider};

/// Main service struct that holds the client provider
pub struct RoleCopyService<P: ClientProvider = SdkClientProvider> {
    pub(crate) provider: P,
}

impl RoleCopyService<SdkClientProvider> {
    /// Create a service backed by AWS SDK clients.
    ///
    /// The configuration is loaded using the default credential provider chain; nothing is
    /// sent to AWS until a copy runs.
    pub async fn new(options: &ClientOptions) -> Self {
        Self::with_provider(SdkClientProvider::load(options).await)
    }
}

impl<P: ClientProvider> RoleCopyService<P> {
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    // copy_role() is implemented in copy.rs
}
