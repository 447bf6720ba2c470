//! Certificate renewal workflow
//!
//! One run moves a single domain configuration through check, issuance, and
//! deployment, persisting state transitions as it goes and leaving a
//! phase-tagged audit trail behind. Runs never retry internally; the
//! external trigger re-evaluates state on its next pass.

pub mod audit;
pub mod orchestrator;
pub mod policy;

pub use audit::RunAudit;
pub use orchestrator::{RenewalWorkflow, RunOutcome};
pub use policy::{RenewalDecision, RenewalPolicy};
