use thiserror::Error;
use std::io;

/// Generic error type
///
/// Every failed backend call surfaces exactly one of these; callers never
/// see transport-library error objects directly.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Network/connectivity failure before a response was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response with a backend-provided message
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend rejected the payload (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable tag for the error kind, independent of the message text.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Transport(_) => "transport",
            Error::Server { .. } => "server",
            Error::NotFound(_) => "not_found",
            Error::Validation(_) => "validation",
            Error::Config(_) => "config",
            Error::Serialization(_) => "serialization",
            Error::Internal(_) => "internal",
        }
    }

    /// HTTP status attached to the error, if the backend responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            Error::NotFound(_) => Some(404),
            Error::Validation(_) => Some(400),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Serialization(format!("Failed to decode response body: {}", err))
        } else {
            Error::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML error: {}", err))
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("Invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_status() {
        let err = Error::Server {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.kind(), "server");
        assert_eq!(err.status(), Some(502));

        let err = Error::NotFound("Certificate not found".to_string());
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.status(), Some(404));

        let err = Error::Transport("connection refused".to_string());
        assert_eq!(err.kind(), "transport");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_display_preserves_backend_message() {
        let err = Error::Validation("valid_from must be before valid_until".to_string());
        assert!(err.to_string().contains("valid_from must be before valid_until"));
    }
}
