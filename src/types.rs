use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Project-wide Result type
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Certificate lifecycle status, derived by the backend from the validity
/// window. Never computed client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    /// Valid and not close to expiry
    Active,
    /// Approaching expiry
    Warning,
    /// Past the end of the validity window
    Expired,
    /// Status string the backend sent that this client does not know
    #[serde(other)]
    Unknown,
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateStatus::Active => write!(f, "active"),
            CertificateStatus::Warning => write!(f, "warning"),
            CertificateStatus::Expired => write!(f, "expired"),
            CertificateStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl Default for CertificateStatus {
    fn default() -> Self {
        CertificateStatus::Active
    }
}

/// A certificate record as owned by the backend. The client only ever holds
/// a read-through copy of this; the backend is the sole source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    /// Opaque unique identifier, stable for the certificate's lifetime
    pub id: String,
    /// Subject host
    pub domain_name: String,
    /// Common name, may be empty depending on backend policy
    #[serde(default)]
    pub common_name: String,
    /// Issuing authority ("Let's Encrypt", "DigiCert", "Self-Signed", ...)
    #[serde(default)]
    pub issuer: String,
    /// Backend-derived lifecycle status
    #[serde(default)]
    pub status: CertificateStatus,
    /// Start of the validity window (UTC)
    pub valid_from: DateTime<Utc>,
    /// End of the validity window (UTC)
    pub valid_until: DateTime<Utc>,
    /// SHA-256 digest identifying the current material version; present only
    /// after issuance and replaced on every rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint_sha256: Option<String>,
    /// Record creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last record update time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Certificate {
    /// Whether the validity window has ended at the given instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.valid_until
    }

    /// Whole days until expiry, negative once expired.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.valid_until - now).num_days()
    }
}

/// Input for creating a certificate record. Validity bounds arrive as
/// date-only values from the UI; the client expands them to UTC instants
/// before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCertificate {
    /// Subject host
    pub domain_name: String,
    /// Common name
    pub common_name: String,
    /// Issuing authority
    pub issuer: String,
    /// First day of validity (inclusive)
    pub valid_from: NaiveDate,
    /// Last day of validity (inclusive)
    pub valid_until: NaiveDate,
}

/// Partial update for an existing certificate record. Unset fields are left
/// untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CertificateUpdate {
    /// New subject host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    /// New common name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// New issuing authority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_cert() -> Certificate {
        Certificate {
            id: "cert-1".to_string(),
            domain_name: "example.com".to_string(),
            common_name: "*.example.com".to_string(),
            issuer: "Let's Encrypt".to_string(),
            status: CertificateStatus::Active,
            valid_from: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            valid_until: Utc.with_ymd_and_hms(2026, 1, 1, 23, 59, 59).unwrap(),
            fingerprint_sha256: Some("aa11".to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_status_round_trip() {
        let json = serde_json::to_string(&CertificateStatus::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        let status: CertificateStatus = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(status, CertificateStatus::Expired);
    }

    #[test]
    fn test_unrecognized_status_maps_to_unknown() {
        let status: CertificateStatus = serde_json::from_str("\"revoked\"").unwrap();
        assert_eq!(status, CertificateStatus::Unknown);
    }

    #[test]
    fn test_deserialize_backend_record() {
        // Shape as returned by the backend, fingerprint absent before issuance
        let json = r#"{
            "id": "b9c7",
            "domain_name": "api.example.com",
            "common_name": "api.example.com",
            "issuer": "DigiCert",
            "status": "active",
            "valid_from": "2025-01-01T00:00:00Z",
            "valid_until": "2026-01-01T23:59:59Z"
        }"#;
        let cert: Certificate = serde_json::from_str(json).unwrap();
        assert_eq!(cert.domain_name, "api.example.com");
        assert!(cert.fingerprint_sha256.is_none());
        assert!(cert.created_at.is_none());
    }

    #[test]
    fn test_days_remaining() {
        let cert = sample_cert();
        let now = Utc.with_ymd_and_hms(2025, 12, 2, 23, 59, 59).unwrap();
        assert_eq!(cert.days_remaining(now), 30);
        assert!(!cert.is_expired(now));

        let after = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        assert!(cert.is_expired(after));
        assert!(cert.days_remaining(after) <= 0);
    }
}
