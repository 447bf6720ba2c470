//! # Configuration Management
//!
//! This module provides configuration management for the certplane core.
//! Settings come from environment variables with sensible defaults and are
//! validated before anything touches the database.

mod settings;

pub use settings::{AppConfig, DatabaseConfig, ObservabilityConfig, RenewalConfig};
