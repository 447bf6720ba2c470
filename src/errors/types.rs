//! # Error Types
//!
//! Comprehensive error types for the certplane core using `thiserror`.

use std::fmt;

/// Custom result type for certplane operations
pub type Result<T> = std::result::Result<T, CertplaneError>;

/// Main error type for the certplane core
#[derive(thiserror::Error, Debug)]
pub enum CertplaneError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database and storage errors
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Resource not found errors
    #[error("Resource not found: {resource_type} with ID '{id}'")]
    NotFound { resource_type: String, id: String },

    /// Access reference expansion errors, aggregated across relations
    #[error("Access expansion failed: {}", summarize_failures(.failures))]
    Expand { failures: Vec<ExpandFailure> },

    /// No provider registered for a configured identifier
    #[error("No {kind} provider registered for '{identifier}'")]
    ProviderResolution {
        kind: ProviderKind,
        identifier: String,
    },

    /// Certificate issuance errors reported by a provider
    #[error("Certificate issuance failed: {message}")]
    Issuance {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Certificate deployment errors reported by a provider
    #[error("Certificate deployment failed: {message}")]
    Deployment {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Run aborted by a cancellation signal before the named phase
    #[error("Run cancelled before {phase}")]
    Cancelled { phase: String },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// A single failed access reference, kept per relation so callers can see
/// every broken link in one error rather than the first one hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandFailure {
    /// Relation that failed to resolve (e.g. `access`, `target_access`)
    pub relation: String,
    /// Human-readable reason the reference did not resolve
    pub reason: String,
}

impl fmt::Display for ExpandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.relation, self.reason)
    }
}

fn summarize_failures(failures: &[ExpandFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Which provider family a resolution error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Issuance,
    Deployment,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Issuance => write!(f, "issuance"),
            ProviderKind::Deployment => write!(f, "deployment"),
        }
    }
}

impl CertplaneError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a database error with context
    pub fn database<S: Into<String>>(source: sqlx::Error, context: S) -> Self {
        Self::Database {
            source,
            context: context.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource_type: R, id: I) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Create an expansion error from the collected per-relation failures
    pub fn expand(failures: Vec<ExpandFailure>) -> Self {
        Self::Expand { failures }
    }

    /// Create a provider resolution error
    pub fn provider_resolution<S: Into<String>>(kind: ProviderKind, identifier: S) -> Self {
        Self::ProviderResolution {
            kind,
            identifier: identifier.into(),
        }
    }

    /// Create an issuance error
    pub fn issuance<S: Into<String>>(message: S) -> Self {
        Self::Issuance {
            message: message.into(),
            source: None,
        }
    }

    /// Create an issuance error with source
    pub fn issuance_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Issuance {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a deployment error
    pub fn deployment<S: Into<String>>(message: S) -> Self {
        Self::Deployment {
            message: message.into(),
            source: None,
        }
    }

    /// Create a deployment error with source
    pub fn deployment_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Deployment {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a cancellation error naming the phase that was about to start
    pub fn cancelled<S: Into<String>>(phase: S) -> Self {
        Self::Cancelled {
            phase: phase.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Check if this error should be retried
    ///
    /// The core never retries on its own; this is a hint for callers that
    /// schedule runs.
    pub fn is_retryable(&self) -> bool {
        match self {
            CertplaneError::Database { .. } => true,
            CertplaneError::Io { .. } => true,
            CertplaneError::Issuance { .. } => true,
            CertplaneError::Deployment { .. } => true,
            _ => false,
        }
    }
}

// Error conversions for common external error types
impl From<sqlx::Error> for CertplaneError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database {
            source: error,
            context: "Database operation failed".to_string(),
        }
    }
}

impl From<std::io::Error> for CertplaneError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            source: error,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl From<serde_json::Error> for CertplaneError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            source: error,
            context: "JSON serialization failed".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for CertplaneError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}
