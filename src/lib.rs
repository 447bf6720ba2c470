//! # Certplane
//!
//! Certplane is the control core for TLS/SSL certificate lifecycles: it
//! decides when a domain's certificate is due for renewal, obtains material
//! through pluggable issuance providers, pushes it through pluggable
//! deployment providers, and leaves a phase-tagged audit trail behind every
//! run. Scheduling, HTTP surfaces, and the provider protocol clients
//! themselves live outside this crate.
//!
//! ## Architecture
//!
//! The system follows a layered architecture pattern:
//!
//! ```text
//! External trigger → Renewal Workflow → Issuance / Deployment Providers
//!        ↓                  ↓                       ↓
//!  Run audit trail   Persistence Layer      Provider Registry
//! ```
//!
//! ## Core Components
//!
//! - **Renewal Workflow**: phase-sequenced orchestrator (check, apply, deploy)
//! - **Renewal Policy**: pure decision over certificate presence, expiry margin, and deployment state
//! - **Provider Registry**: maps configuration identifiers to issuance/deployment factories
//! - **Persistence Layer**: SQLx with SQLite for configurations, credentials, and run history
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use certplane::config::AppConfig;
//! use certplane::providers::ProviderRegistry;
//! use certplane::storage::{
//!     create_pool, SqlxAccessConfigRepository, SqlxDomainConfigRepository, SqlxRunLogRepository,
//! };
//! use certplane::workflow::RenewalWorkflow;
//! use certplane::DomainConfigId;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> certplane::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     certplane::init_observability(&config.observability)?;
//!
//!     let pool = create_pool(&config.database).await?;
//!     let workflow = RenewalWorkflow::new(
//!         Arc::new(SqlxDomainConfigRepository::new(pool.clone())),
//!         Arc::new(SqlxAccessConfigRepository::new(pool.clone())),
//!         Arc::new(SqlxRunLogRepository::new(pool)),
//!         Arc::new(ProviderRegistry::new()),
//!         &config.renewal,
//!     );
//!
//!     let id = DomainConfigId::from_string("f47ac10b-58cc-4372-a567-0e02b2c3d479".to_string());
//!     let outcome = workflow.run(&id, &CancellationToken::new()).await?;
//!     tracing::info!(outcome = %outcome, "Renewal run finished");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod providers;
pub mod storage;
pub mod workflow;

// Re-export commonly used types and traits
pub use config::AppConfig;
pub use domain::{AccessConfigId, DomainConfigId, RunId};
pub use errors::{CertplaneError, Result};
pub use observability::init_observability;
pub use workflow::{RenewalWorkflow, RunOutcome};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
