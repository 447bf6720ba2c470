//! Run audit accumulator
//!
//! Collects the phase-tagged entries a run produces and turns them into one
//! persistable record at the end. Accumulation is in-memory and infallible;
//! the single fallible step is the commit the orchestrator performs through
//! the run-log repository, once per run, on every exit path.

use crate::domain::{AuditEntry, DomainConfigId, Phase, RunId, RunRecord};
use crate::errors::CertplaneError;
use chrono::{DateTime, Utc};

/// Accumulates the audit trail for one workflow run.
#[derive(Debug)]
pub struct RunAudit {
    run_id: RunId,
    domain_config_id: DomainConfigId,
    started_at: DateTime<Utc>,
    entries: Vec<AuditEntry>,
}

impl RunAudit {
    /// Start a trail for a run over the given configuration.
    pub fn begin(domain_config_id: DomainConfigId) -> Self {
        Self {
            run_id: RunId::new(),
            domain_config_id,
            started_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// The identifier the trail will be persisted under.
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Record a progress entry.
    pub fn record(&mut self, phase: Phase, message: impl Into<String>) {
        self.push(phase, message.into(), None, false);
    }

    /// Record the entry that closes a phase successfully.
    ///
    /// Skipped work still closes its phase; a skip is a completed phase
    /// whose work turned out to be unnecessary.
    pub fn record_complete(&mut self, phase: Phase, message: impl Into<String>) {
        self.push(phase, message.into(), None, true);
    }

    /// Record a failure entry carrying the error text.
    pub fn record_error(&mut self, phase: Phase, message: impl Into<String>, error: &CertplaneError) {
        self.push(phase, message.into(), Some(error.to_string()), false);
    }

    /// Entries recorded so far, in order.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Close the trail, producing the run record and its ordered entries.
    ///
    /// `error` is the run's terminal error, if it failed.
    pub fn finish(self, error: Option<&CertplaneError>) -> (RunRecord, Vec<AuditEntry>) {
        let record = RunRecord {
            id: self.run_id,
            domain_config_id: self.domain_config_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            succeeded: error.is_none(),
            error: error.map(ToString::to_string),
        };
        (record, self.entries)
    }

    fn push(&mut self, phase: Phase, message: String, error: Option<String>, phase_complete: bool) {
        self.entries.push(AuditEntry {
            phase,
            message,
            error,
            phase_complete,
            recorded_at: Utc::now(),
        });
    }
}
