use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::Error;
use crate::types::{Certificate, CertificateUpdate, NewCertificate, Result};

/// Certificate backend interface
///
/// Implementations translate these domain operations into calls against a
/// certificate store and normalize every failure into [`crate::error::Error`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CertificateApi: Send + Sync {
    /// Fetch the full collection. No pagination; the backend returns
    /// everything it has, in its own order.
    async fn list(&self) -> Result<Vec<Certificate>>;

    /// Fetch one record by id.
    async fn get(&self, id: &str) -> Result<Certificate>;

    /// Create a new record. The backend assigns the id and fingerprint.
    async fn create(&self, input: &NewCertificate) -> Result<Certificate>;

    /// Partially update an existing record.
    async fn update(&self, id: &str, update: &CertificateUpdate) -> Result<Certificate>;

    /// Delete a record permanently. Whether a repeat delete is an error is
    /// the backend's idempotency contract; this client does not special-case
    /// "already deleted".
    async fn remove(&self, id: &str) -> Result<()>;

    /// Reissue the certificate's material in place: same id, new fingerprint
    /// and validity window. May be slow; callers must not assume sub-second
    /// completion.
    async fn rotate(&self, id: &str) -> Result<Certificate>;
}

/// Create a certificate client based on configuration
pub fn create_client(settings: &Settings) -> Result<Arc<dyn CertificateApi>> {
    match settings.backend.mode.as_str() {
        "rest" => {
            let client = crate::client::rest::RestClient::new(&settings.backend)?;
            Ok(Arc::new(client))
        }
        "mock" => {
            let client = crate::client::mock::MockBackendClient::new();
            Ok(Arc::new(client))
        }
        other => Err(Error::Config(format!("Unsupported backend mode: {}", other))),
    }
}
