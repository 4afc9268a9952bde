//! Wire-level request/response shapes for the certificate manager REST API.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::NewCertificate;

/// Success envelope wrapping every 2xx payload
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// The actual payload
    pub data: T,
    /// Optional human-readable acknowledgement
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body shape. Deployed backends disagree on the field name
/// (`{"error": ...}` vs `{"status": "error", "message": ...}`), so both are
/// accepted.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload for POST /certificates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCertificateRequest {
    pub domain_name: String,
    pub common_name: String,
    pub issuer: String,
    /// Start of validity, full ISO-8601 UTC instant
    pub valid_from: String,
    /// End of validity, full ISO-8601 UTC instant
    pub valid_until: String,
}

impl From<&NewCertificate> for CreateCertificateRequest {
    fn from(input: &NewCertificate) -> Self {
        Self {
            domain_name: input.domain_name.clone(),
            common_name: input.common_name.clone(),
            issuer: input.issuer.clone(),
            valid_from: format_utc_instant(day_start(input.valid_from)),
            valid_until: format_utc_instant(day_end(input.valid_until)),
        }
    }
}

/// Start-of-day UTC instant for a date-only validity bound.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

/// End-of-day (23:59:59) UTC instant for a date-only validity bound.
pub fn day_end(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(23, 59, 59).unwrap())
}

/// RFC 3339 with a `Z` suffix and whole seconds, the format the backend
/// stores verbatim.
pub fn format_utc_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Map a non-2xx response to the error taxonomy, preserving the backend's
/// message text verbatim for display.
pub fn error_from_response(status: StatusCode, body: &str) -> Error {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .error
        .or(parsed.message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });

    match status {
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::BAD_REQUEST => Error::Validation(message),
        _ => Error::Server {
            status: status.as_u16(),
            message,
        },
    }
}
