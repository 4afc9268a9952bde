use serde::{Deserialize, Serialize};

use crate::types::Result;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General configuration
    #[serde(default)]
    pub general: GeneralConfig,

    /// Certificate backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Application name
    pub app_name: String,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            app_name: "certman".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Certificate backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend kind (rest, mock)
    pub mode: String,

    /// Base URL of the certificate manager service
    pub base_url: String,

    /// Static API key sent with every request
    pub api_key: String,

    /// Request timeout in seconds. Rotation is a real cryptographic
    /// operation backend-side, so this stays generous.
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: "rest".to_string(),
            base_url: String::new(),
            api_key: String::new(),
            timeout_seconds: 30,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Emit JSON-formatted logs instead of text
    pub structured_logging: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            structured_logging: false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            backend: BackendConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Sources, later ones winning: built-in defaults, the YAML file named
    /// by `CERTMAN_CONFIG` (or `config/certman.yaml` if present), then
    /// `CERTMAN_*` environment variables.
    pub fn load() -> Result<Self> {
        use config::{Config, Environment, File};
        use std::env;

        let mut builder = Config::builder();

        builder = builder.add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CERTMAN_CONFIG") {
            builder = builder.add_source(File::with_name(&config_path));
        } else {
            builder = builder.add_source(File::with_name("config/certman").required(false));
        }

        builder = builder.add_source(Environment::with_prefix("CERTMAN").separator("__"));

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check configuration for startup-time problems
    ///
    /// A missing base URL in rest mode fails here; a missing API key is
    /// surfaced later as a warning, since the backend may not require one.
    pub fn validate(&self) -> Result<()> {
        match self.backend.mode.as_str() {
            "rest" => {
                if self.backend.base_url.is_empty() {
                    return Err(crate::error::Error::Config(
                        "Backend base URL must be provided in rest mode".into(),
                    ));
                }
            }
            "mock" => {}
            other => {
                return Err(crate::error::Error::Config(format!(
                    "Unsupported backend mode: {}",
                    other
                )));
            }
        }

        if self.backend.timeout_seconds == 0 {
            return Err(crate::error::Error::Config(
                "Backend timeout cannot be zero".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_mockless_rest() {
        let settings = Settings::default();
        assert_eq!(settings.backend.mode, "rest");
        assert_eq!(settings.backend.timeout_seconds, 30);
        assert!(!settings.telemetry.structured_logging);
    }

    #[test]
    fn test_validate_rejects_rest_without_base_url() {
        let settings = Settings::default();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_mock_without_base_url() {
        let mut settings = Settings::default();
        settings.backend.mode = "mock".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_mode() {
        let mut settings = Settings::default();
        settings.backend.mode = "graphql".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_yaml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("certman.yaml");

        let config_content = r#"
general:
  app_name: "certman-staging"
  log_level: "debug"
backend:
  mode: "rest"
  base_url: "https://certs.example.com/api/v1"
  api_key: "test-key-123"
  timeout_seconds: 60
telemetry:
  structured_logging: true
"#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        env::set_var("CERTMAN_CONFIG", config_path.to_str().unwrap());
        let settings = Settings::load();
        env::remove_var("CERTMAN_CONFIG");

        let settings = settings.unwrap();
        assert_eq!(settings.general.log_level, "debug");
        assert_eq!(settings.backend.base_url, "https://certs.example.com/api/v1");
        assert_eq!(settings.backend.api_key, "test-key-123");
        assert_eq!(settings.backend.timeout_seconds, 60);
        assert!(settings.telemetry.structured_logging);
    }
}
