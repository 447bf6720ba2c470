//! Domain layer
//!
//! This module contains pure domain entities and business logic
//! with zero infrastructure dependencies. Domain types represent
//! the core concepts of the certificate lifecycle system.
//!
//! ## Design Principles
//!
//! - **Zero Infrastructure Dependencies**: Domain types do not depend on
//!   databases, providers, or external systems
//! - **Business Logic Encapsulation**: Domain entities contain their own
//!   validation and state predicates
//! - **Testability**: All domain logic can be tested without mocks or
//!   external systems
//!
//! ## Module Organization
//!
//! - `id`: Type-safe record identifiers with NewType pattern
//! - `access`: Credential records shared across domain configurations
//! - `certificate`: Issued certificate material bundles
//! - `domain_config`: The managed-domain entity the workflow operates on
//! - `run`: Workflow run summaries and phase-tagged audit entries

pub mod access;
pub mod certificate;
pub mod domain_config;
pub mod id;
pub mod run;

// Re-export main types from each module
pub use access::{AccessConfig, CreateAccessConfigRequest, ResolvedAccess};
pub use certificate::CertificateBundle;
pub use domain_config::{CreateDomainConfigRequest, DomainConfig};
pub use id::{AccessConfigId, DomainConfigId, RunId};
pub use run::{AuditEntry, Phase, RunRecord};
