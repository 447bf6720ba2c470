//! # Observability Infrastructure
//!
//! This module provides observability for the certplane core: structured
//! logging through the tracing ecosystem, with span instrumentation applied
//! at the storage and workflow layers.

pub mod logging;

pub use logging::{init_logging, log_config_info};

use crate::config::ObservabilityConfig;
use crate::errors::Result;
use tracing::info;

/// Initialize all observability components
pub fn init_observability(config: &ObservabilityConfig) -> Result<()> {
    init_logging(config)?;

    info!(
        service_name = %config.service_name,
        log_level = %config.log_level,
        "Observability initialized successfully"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_observability() {
        let config = ObservabilityConfig::default();

        let result = init_observability(&config);
        assert!(result.is_ok());
    }
}
