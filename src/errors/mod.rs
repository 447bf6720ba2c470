//! # Error Handling
//!
//! This module provides error handling for the certplane core.
//! It defines custom error types using `thiserror` for every layer of the
//! renewal pipeline, from storage up to the workflow orchestrator.

mod types;

pub use types::{CertplaneError, ExpandFailure, ProviderKind, Result};
