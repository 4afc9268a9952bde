use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::config::Settings;
use crate::error::Error;
use crate::types::Result;

/// Initialize the logging system
pub fn init_logging(settings: &Settings) -> Result<()> {
    let log_level = match settings.general.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(log_level.into());

    if settings.telemetry.structured_logging {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(true).json())
            .try_init()
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    }
    .map_err(|e| Error::Internal(format!("Failed to set global default subscriber: {}", e)))
}
