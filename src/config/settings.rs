//! # Configuration Settings
//!
//! Defines the configuration structure for the certplane core.

use crate::errors::{CertplaneError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// Database configuration
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,

    /// Renewal policy configuration
    #[validate(nested)]
    pub renewal: RenewalConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        // Use validator crate for basic validation
        Validate::validate(self).map_err(CertplaneError::from)?;

        // Custom validation logic
        self.validate_custom()?;

        Ok(())
    }

    /// Custom validation logic that goes beyond what the validator crate can do
    fn validate_custom(&self) -> Result<()> {
        // Validate database URL format
        if !self.database.url.starts_with("sqlite://") {
            return Err(CertplaneError::validation(
                "Database URL must start with 'sqlite://'",
            ));
        }

        // A certificate must outlive the renewal margin, otherwise freshly
        // issued material is immediately due again
        if self.renewal.issued_validity_days as u64 * 24 <= self.renewal.renewal_margin_hours {
            return Err(CertplaneError::validation(
                "Issued validity must be longer than the renewal margin",
            ));
        }

        Ok(())
    }

    /// Create AppConfig from environment variables
    ///
    /// The assembled configuration is validated before it is returned.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            database: DatabaseConfig::from_env(),
            observability: ObservabilityConfig::from_env(),
            renewal: RenewalConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "Database URL cannot be empty"))]
    pub url: String,

    /// Maximum number of connections in the pool
    #[validate(range(
        min = 1,
        max = 100,
        message = "Max connections must be between 1 and 100"
    ))]
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    #[validate(range(
        min = 0,
        max = 50,
        message = "Min connections must be between 0 and 50"
    ))]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[validate(range(
        min = 1,
        max = 60,
        message = "Connect timeout must be between 1 and 60 seconds"
    ))]
    pub connect_timeout_seconds: u64,

    /// Idle timeout in seconds (0 = no timeout)
    pub idle_timeout_seconds: u64,

    /// Enable automatic migrations
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/certplane.db".to_string(),
            max_connections: 10,
            min_connections: 0,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 600, // 10 minutes
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Get connection timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Get idle timeout as Duration (None if 0)
    pub fn idle_timeout(&self) -> Option<Duration> {
        if self.idle_timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.idle_timeout_seconds))
        }
    }

    /// Check if this is a SQLite configuration
    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite://")
    }

    /// Create DatabaseConfig from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/certplane.db".to_string());

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let min_connections = std::env::var("DATABASE_MIN_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0);

        let connect_timeout_seconds = std::env::var("DATABASE_CONNECT_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);

        let idle_timeout_seconds = std::env::var("DATABASE_IDLE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(600);

        let auto_migrate = std::env::var("DATABASE_AUTO_MIGRATE")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(true);

        Self {
            url,
            max_connections,
            min_connections,
            connect_timeout_seconds,
            idle_timeout_seconds,
            auto_migrate,
        }
    }
}

/// Observability configuration for logging and tracing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Tracing service name
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Log level (trace, debug, info, warn, error)
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "certplane".to_string(),
            log_level: "info".to_string(),
            json_logging: false,
        }
    }
}

impl ObservabilityConfig {
    /// Create ObservabilityConfig from environment variables
    pub fn from_env() -> Self {
        let service_name =
            std::env::var("CERTPLANE_SERVICE_NAME").unwrap_or_else(|_| "certplane".to_string());

        let log_level = std::env::var("CERTPLANE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let json_logging = std::env::var("CERTPLANE_LOG_JSON")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(false);

        Self {
            service_name,
            log_level,
            json_logging,
        }
    }
}

/// Renewal policy configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenewalConfig {
    /// How long before expiry a certificate counts as due, in hours
    #[validate(range(
        min = 1,
        max = 720,
        message = "Renewal margin must be between 1 hour and 30 days"
    ))]
    pub renewal_margin_hours: u64,

    /// Validity recorded for freshly issued certificates, in days
    #[validate(range(
        min = 1,
        max = 825,
        message = "Issued validity must be between 1 and 825 days"
    ))]
    pub issued_validity_days: u32,
}

impl Default for RenewalConfig {
    fn default() -> Self {
        Self {
            renewal_margin_hours: 24,
            issued_validity_days: 90,
        }
    }
}

impl RenewalConfig {
    /// Get the renewal margin as a chrono Duration
    pub fn margin(&self) -> chrono::Duration {
        chrono::Duration::hours(self.renewal_margin_hours as i64)
    }

    /// Get the issued validity as a chrono Duration
    pub fn validity(&self) -> chrono::Duration {
        chrono::Duration::days(self.issued_validity_days as i64)
    }

    /// Create RenewalConfig from environment variables
    pub fn from_env() -> Self {
        let renewal_margin_hours = std::env::var("CERTPLANE_RENEWAL_MARGIN_HOURS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(24);

        let issued_validity_days = std::env::var("CERTPLANE_ISSUED_VALIDITY_DAYS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(90);

        Self {
            renewal_margin_hours,
            issued_validity_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_config_timeouts() {
        let config = DatabaseConfig {
            connect_timeout_seconds: 15,
            idle_timeout_seconds: 300,
            ..Default::default()
        };
        assert_eq!(config.connect_timeout(), Duration::from_secs(15));
        assert_eq!(config.idle_timeout(), Some(Duration::from_secs(300)));

        let config_no_idle = DatabaseConfig {
            idle_timeout_seconds: 0,
            ..Default::default()
        };
        assert_eq!(config_no_idle.idle_timeout(), None);
    }

    #[test]
    fn test_database_config_type_detection() {
        let sqlite_config = DatabaseConfig {
            url: "sqlite://./test.db".to_string(),
            ..Default::default()
        };
        assert!(sqlite_config.is_sqlite());

        let other_config = DatabaseConfig {
            url: "postgresql://localhost/test".to_string(),
            ..Default::default()
        };
        assert!(!other_config.is_sqlite());
    }

    #[test]
    fn test_renewal_config_durations() {
        let config = RenewalConfig {
            renewal_margin_hours: 48,
            issued_validity_days: 30,
        };
        assert_eq!(config.margin(), chrono::Duration::hours(48));
        assert_eq!(config.validity(), chrono::Duration::days(30));
    }

    #[test]
    fn test_renewal_config_defaults() {
        let config = RenewalConfig::default();
        assert_eq!(config.renewal_margin_hours, 24);
        assert_eq!(config.issued_validity_days, 90);
    }

    #[test]
    fn test_config_validation_errors() {
        // Test non-sqlite database URL
        let mut config = AppConfig::default();
        config.database.url = "postgresql://localhost/test".to_string();
        assert!(config.validate().is_err());

        // Test validity not exceeding margin
        let mut config = AppConfig::default();
        config.renewal.renewal_margin_hours = 24;
        config.renewal.issued_validity_days = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_ranges() {
        let mut config = AppConfig::default();

        // Test invalid margin
        config.renewal.renewal_margin_hours = 0;
        assert!(config.validate().is_err());

        // Test invalid max connections
        config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        config.database.max_connections = 200;
        assert!(config.validate().is_err());
    }
}
