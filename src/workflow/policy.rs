//! Renewal decision policy
//!
//! Pure decision over the current certificate state: presence, remaining
//! validity, and whether the last deployment was confirmed.

use crate::domain::DomainConfig;
use chrono::{DateTime, Duration, Utc};

/// What a renewal run must do for a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalDecision {
    /// Valid material already deployed; the run ends after checks
    SkipAll,
    /// Valid material whose deployment was never confirmed; deploy again
    DeployOnly,
    /// Material missing or expiring inside the margin; issue then deploy
    IssueAndDeploy,
}

/// Decides whether issuance and deployment may be skipped.
///
/// Deployment is idempotent and cheap to retry, so the policy re-attempts it
/// whenever success is not already confirmed. Issuance calls go to
/// rate-limited external authorities and are skipped whenever the stored
/// material still clears the safety margin.
#[derive(Debug, Clone, Copy)]
pub struct RenewalPolicy {
    margin: Duration,
}

impl RenewalPolicy {
    /// Create a policy with the given safety margin before expiry.
    pub fn new(margin: Duration) -> Self {
        Self { margin }
    }

    /// The safety margin this policy applies.
    pub fn margin(&self) -> Duration {
        self.margin
    }

    /// Decide what a run over `config` must do at time `now`.
    ///
    /// Missing material or a missing expiry timestamp counts as expired.
    pub fn decide(&self, config: &DomainConfig, now: DateTime<Utc>) -> RenewalDecision {
        if !config.certificate_valid_beyond(now, self.margin) {
            return RenewalDecision::IssueAndDeploy;
        }
        if config.deployed {
            RenewalDecision::SkipAll
        } else {
            RenewalDecision::DeployOnly
        }
    }
}

impl Default for RenewalPolicy {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}
