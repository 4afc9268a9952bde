pub mod mock;
pub mod provider;
pub mod rest;
pub mod wire;

// Re-export key types
pub use mock::MockBackendClient;
pub use provider::{create_client, CertificateApi};
pub use rest::RestClient;
