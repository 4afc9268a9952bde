//! certman - client library for a remote TLS certificate manager service
//!
//! Wraps the certificate REST API behind the [`client::CertificateApi`]
//! trait and sequences calls into race-safe view state through
//! [`controller::CertificateController`].

// Foundational layer
pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

// Core layer
pub mod client;
pub mod controller;

// Public key types
pub use crate::client::{create_client, CertificateApi, MockBackendClient, RestClient};
pub use crate::controller::CertificateController;
pub use crate::error::Error;
pub use crate::types::{Certificate, CertificateStatus, CertificateUpdate, NewCertificate, Result};
