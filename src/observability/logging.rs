//! # Structured Logging
//!
//! Subscriber setup for the tracing ecosystem. Log output is line-oriented
//! by default and switches to JSON when configured, so runs can feed a log
//! pipeline without a separate exporter.

use crate::config::{AppConfig, ObservabilityConfig};
use crate::errors::Result;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured log level when set. Initialization is
/// tolerant of an already-installed subscriber so integration tests and
/// embedding applications can bring their own.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    // A subscriber may already be installed (integration tests, embedding
    // applications); that is not an error here.
    let _ = if config.json_logging {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    Ok(())
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    tracing::info!(
        service_name = %config.observability.service_name,
        log_level = %config.observability.log_level,
        json_logging = config.observability.json_logging,
        auto_migrate = config.database.auto_migrate,
        renewal_margin_hours = config.renewal.renewal_margin_hours,
        issued_validity_days = config.renewal.issued_validity_days,
        "Certplane core configuration"
    );
}
