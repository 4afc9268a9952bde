use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::client::provider::CertificateApi;
use crate::client::wire::{day_end, day_start};
use crate::error::Error;
use crate::types::{Certificate, CertificateStatus, CertificateUpdate, NewCertificate, Result};

/// Days before expiry at which the backend flips a certificate to `warning`
const WARNING_WINDOW_DAYS: i64 = 30;

/// Validity window a rotation grants, matching the real backend's policy
const ROTATED_VALIDITY_DAYS: i64 = 365;

/// In-memory certificate backend
///
/// Plays the server role for demos and tests: assigns ids and fingerprints,
/// derives `status` from the validity window, and simulates the latency of
/// reissuance. No state survives the process.
pub struct MockBackendClient {
    /// Issued certificates keyed by id
    store: Mutex<HashMap<String, Certificate>>,
    /// Simulated backend processing delay
    delay: Duration,
}

impl MockBackendClient {
    /// Create an empty mock backend
    pub fn new() -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
            delay: Duration::from_millis(20),
        }
    }

    /// Create a mock backend pre-seeded with records
    pub fn with_certificates(certs: Vec<Certificate>) -> Self {
        let store = certs
            .into_iter()
            .map(|cert| (cert.id.clone(), cert))
            .collect();
        Self {
            store: Mutex::new(store),
            delay: Duration::from_millis(20),
        }
    }

    fn generate_fingerprint() -> String {
        let mut rng = rand::thread_rng();
        (0..32).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
    }

    fn derive_status(valid_until: DateTime<Utc>, now: DateTime<Utc>) -> CertificateStatus {
        if now >= valid_until {
            CertificateStatus::Expired
        } else if (valid_until - now).num_days() < WARNING_WINDOW_DAYS {
            CertificateStatus::Warning
        } else {
            CertificateStatus::Active
        }
    }
}

impl Default for MockBackendClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CertificateApi for MockBackendClient {
    async fn list(&self) -> Result<Vec<Certificate>> {
        debug!("Mock backend: listing certificates");
        let store = self.store.lock().unwrap();
        Ok(store.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Certificate> {
        let store = self.store.lock().unwrap();
        store
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Certificate not found".into()))
    }

    async fn create(&self, input: &NewCertificate) -> Result<Certificate> {
        debug!("Mock backend: creating certificate for {}", input.domain_name);

        if input.domain_name.is_empty() {
            return Err(Error::Validation("domain_name is required".into()));
        }

        let valid_from = day_start(input.valid_from);
        let valid_until = day_end(input.valid_until);
        if valid_from >= valid_until {
            return Err(Error::Validation(
                "valid_from must be before valid_until".into(),
            ));
        }

        // Simulate issuance latency
        tokio::time::sleep(self.delay).await;

        let now = Utc::now();
        let cert = Certificate {
            id: Uuid::new_v4().to_string(),
            domain_name: input.domain_name.clone(),
            common_name: input.common_name.clone(),
            issuer: input.issuer.clone(),
            status: Self::derive_status(valid_until, now),
            valid_from,
            valid_until,
            fingerprint_sha256: Some(Self::generate_fingerprint()),
            created_at: Some(now),
            updated_at: Some(now),
        };

        let mut store = self.store.lock().unwrap();
        store.insert(cert.id.clone(), cert.clone());
        Ok(cert)
    }

    async fn update(&self, id: &str, update: &CertificateUpdate) -> Result<Certificate> {
        let mut store = self.store.lock().unwrap();
        let cert = store
            .get_mut(id)
            .ok_or_else(|| Error::NotFound("Certificate not found".into()))?;

        if let Some(domain_name) = &update.domain_name {
            cert.domain_name = domain_name.clone();
        }
        if let Some(common_name) = &update.common_name {
            cert.common_name = common_name.clone();
        }
        if let Some(issuer) = &update.issuer {
            cert.issuer = issuer.clone();
        }
        cert.updated_at = Some(Utc::now());

        Ok(cert.clone())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        debug!("Mock backend: deleting certificate {}", id);
        let mut store = self.store.lock().unwrap();
        store
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("Certificate not found".into()))
    }

    async fn rotate(&self, id: &str) -> Result<Certificate> {
        debug!("Mock backend: rotating certificate {}", id);

        // Reissuance is the slow path
        tokio::time::sleep(self.delay).await;

        let now = Utc::now();
        let mut store = self.store.lock().unwrap();
        let cert = store
            .get_mut(id)
            .ok_or_else(|| Error::NotFound("Certificate not found".into()))?;

        // Same id, new material: fresh fingerprint and validity window
        cert.fingerprint_sha256 = Some(Self::generate_fingerprint());
        cert.valid_from = now;
        cert.valid_until = now + ChronoDuration::days(ROTATED_VALIDITY_DAYS);
        cert.status = Self::derive_status(cert.valid_until, now);
        cert.updated_at = Some(now);

        Ok(cert.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_input() -> NewCertificate {
        NewCertificate {
            domain_name: "example.com".to_string(),
            common_name: "*.example.com".to_string(),
            issuer: "Let's Encrypt".to_string(),
            valid_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_fingerprint() {
        let backend = MockBackendClient::new();
        let cert = backend.create(&sample_input()).await.unwrap();
        assert!(!cert.id.is_empty());
        assert_eq!(cert.fingerprint_sha256.as_ref().unwrap().len(), 64);
        assert_eq!(cert.status, CertificateStatus::Active);

        let listed = backend.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].domain_name, "example.com");
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_validity_window() {
        let backend = MockBackendClient::new();
        let mut input = sample_input();
        input.valid_from = NaiveDate::from_ymd_opt(2099, 1, 2).unwrap();
        let err = backend.create(&input).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn test_rotate_keeps_id_and_replaces_fingerprint() {
        let backend = MockBackendClient::new();
        let cert = backend.create(&sample_input()).await.unwrap();
        let old_fingerprint = cert.fingerprint_sha256.clone().unwrap();

        let rotated = backend.rotate(&cert.id).await.unwrap();
        assert_eq!(rotated.id, cert.id);
        assert_ne!(rotated.fingerprint_sha256.unwrap(), old_fingerprint);
        assert!(rotated.valid_until > cert.valid_until || rotated.valid_from > cert.valid_from);
    }

    #[tokio::test]
    async fn test_remove_then_get_is_not_found() {
        let backend = MockBackendClient::new();
        let cert = backend.create(&sample_input()).await.unwrap();
        backend.remove(&cert.id).await.unwrap();

        let err = backend.get(&cert.id).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");

        // Second delete surfaces the backend's own idempotency contract
        let err = backend.remove(&cert.id).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn test_status_derived_from_validity_window() {
        let now = Utc::now();
        assert_eq!(
            MockBackendClient::derive_status(now - ChronoDuration::days(1), now),
            CertificateStatus::Expired
        );
        assert_eq!(
            MockBackendClient::derive_status(now + ChronoDuration::days(10), now),
            CertificateStatus::Warning
        );
        assert_eq!(
            MockBackendClient::derive_status(now + ChronoDuration::days(200), now),
            CertificateStatus::Active
        );
    }

    #[tokio::test]
    async fn test_update_applies_partial_fields() {
        let backend = MockBackendClient::new();
        let cert = backend.create(&sample_input()).await.unwrap();

        let update = CertificateUpdate {
            issuer: Some("DigiCert".to_string()),
            ..Default::default()
        };
        let updated = backend.update(&cert.id, &update).await.unwrap();
        assert_eq!(updated.issuer, "DigiCert");
        assert_eq!(updated.domain_name, cert.domain_name);
    }
}
