//! Workflow run domain types
//!
//! A run is one pass of the renewal workflow over a single domain
//! configuration. Each run leaves behind a summary record and an ordered,
//! phase-tagged trail of audit entries describing what happened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::id::{DomainConfigId, RunId};

/// The phase tags audit entries are grouped under, in run order.
///
/// Persisting the issued material belongs to `apply`; recording the deployed
/// flag belongs to `deploy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Load the configuration, resolve credentials, decide what to do
    Check,
    /// Obtain new certificate material and persist it
    Apply,
    /// Push the stored material to the deployment target and record the result
    Deploy,
}

impl Phase {
    /// Get the database representation of this phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Apply => "apply",
            Self::Deploy => "deploy",
        }
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check" => Ok(Self::Check),
            "apply" => Ok(Self::Apply),
            "deploy" => Ok(Self::Deploy),
            _ => Err(format!("Unknown phase: {}", s)),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of the audit trail a run leaves behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Phase that produced this entry
    pub phase: Phase,
    /// What happened, in operator-facing language
    pub message: String,
    /// Error text when the entry records a failure
    pub error: Option<String>,
    /// Whether this entry closes its phase successfully
    pub phase_complete: bool,
    /// When the entry was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Summary of one finished workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: RunId,
    /// Configuration the run operated on
    pub domain_config_id: DomainConfigId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Whether the run ended without error
    pub succeeded: bool,
    /// Error text when the run failed
    pub error: Option<String>,
}
