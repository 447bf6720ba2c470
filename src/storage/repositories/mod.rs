//! Repository modules for data access
//!
//! This module provides repository implementations split into focused, manageable files.
//! Each repository handles persistence for a specific resource type.

use crate::errors::{CertplaneError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

pub mod access_config;
pub mod domain_config;
pub mod run_log;

// Re-export all repository types
pub use access_config::{AccessConfigRepository, SqlxAccessConfigRepository};
pub use domain_config::{DomainConfigRepository, SqlxDomainConfigRepository};
pub use run_log::{RunLogRepository, SqlxRunLogRepository};

/// Parse a timestamp string that may be in RFC 3339 format (from application)
/// or SQLite datetime format (from DEFAULT datetime('now')).
pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    // Try RFC 3339 first (application-provided timestamps)
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try SQLite datetime format: "YYYY-MM-DD HH:MM:SS"
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }

    Err(CertplaneError::validation(format!("Invalid timestamp format: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let parsed = parse_timestamp("2026-08-23T10:30:00+00:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-08-23T10:30:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_sqlite_format() {
        let parsed = parse_timestamp("2026-08-23 10:30:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-08-23T10:30:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert!(parse_timestamp("not-a-timestamp").is_err());
    }
}
