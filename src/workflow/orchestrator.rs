//! Renewal workflow orchestrator
//!
//! Drives one run over one domain configuration: check state, issue if the
//! stored certificate no longer clears the margin, persist the material,
//! deploy, and record the deployed flag. Every step lands in the run's audit
//! trail, which is committed exactly once however the run ends.

use crate::config::RenewalConfig;
use crate::domain::{DomainConfigId, Phase};
use crate::errors::{CertplaneError, Result};
use crate::providers::ProviderRegistry;
use crate::storage::repositories::{
    AccessConfigRepository, DomainConfigRepository, RunLogRepository,
};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use super::audit::RunAudit;
use super::policy::{RenewalDecision, RenewalPolicy};

/// Which path a successful run took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Valid material already deployed; no provider was invoked
    Skipped,
    /// Existing material was pushed to the target again
    Redeployed,
    /// New material was issued and deployed
    Renewed,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Redeployed => "redeployed",
            Self::Renewed => "renewed",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Orchestrates certificate renewal runs.
///
/// Holds no per-run state; one instance serves any number of sequential or
/// concurrent runs over different configurations. Concurrent runs over the
/// same configuration are not coordinated here; callers must guarantee at
/// most one in-flight run per configuration.
pub struct RenewalWorkflow {
    domain_configs: Arc<dyn DomainConfigRepository>,
    access_configs: Arc<dyn AccessConfigRepository>,
    run_log: Arc<dyn RunLogRepository>,
    registry: Arc<ProviderRegistry>,
    policy: RenewalPolicy,
    validity: chrono::Duration,
}

impl RenewalWorkflow {
    pub fn new(
        domain_configs: Arc<dyn DomainConfigRepository>,
        access_configs: Arc<dyn AccessConfigRepository>,
        run_log: Arc<dyn RunLogRepository>,
        registry: Arc<ProviderRegistry>,
        renewal: &RenewalConfig,
    ) -> Self {
        Self {
            domain_configs,
            access_configs,
            run_log,
            registry,
            policy: RenewalPolicy::new(renewal.margin()),
            validity: renewal.validity(),
        }
    }

    /// Execute one renewal run for the given configuration.
    ///
    /// The audit trail is committed before this returns, on success and on
    /// every error path alike. A commit failure is logged and does not
    /// change the run's own result; an unobservable run must not turn a
    /// success into a failure.
    #[instrument(skip(self, cancel), fields(domain_config_id = %id), name = "renewal_run")]
    pub async fn run(&self, id: &DomainConfigId, cancel: &CancellationToken) -> Result<RunOutcome> {
        let mut audit = RunAudit::begin(id.clone());
        let result = self.execute(id, cancel, &mut audit).await;

        match &result {
            Ok(outcome) => {
                info!(run_id = %audit.run_id(), outcome = %outcome, "Renewal run finished");
            }
            Err(e) => {
                error!(run_id = %audit.run_id(), error = %e, "Renewal run failed");
            }
        }

        let (record, entries) = audit.finish(result.as_ref().err());
        if let Err(commit_error) = self.run_log.record_run(&record, &entries).await {
            error!(run_id = %record.id, error = %commit_error, "Failed to commit run audit trail");
        }

        result
    }

    async fn execute(
        &self,
        id: &DomainConfigId,
        cancel: &CancellationToken,
        audit: &mut RunAudit,
    ) -> Result<RunOutcome> {
        audit.record(Phase::Check, "starting checks");

        let config = match self.domain_configs.get_by_id(id).await {
            Ok(Some(config)) => config,
            Ok(None) => {
                let e = CertplaneError::not_found("DomainConfig", id.as_str());
                audit.record_error(Phase::Check, "failed to load domain configuration", &e);
                return Err(e);
            }
            Err(e) => {
                audit.record_error(Phase::Check, "failed to load domain configuration", &e);
                return Err(e);
            }
        };

        let resolved = match self.access_configs.expand_access(&config).await {
            Ok(resolved) => resolved,
            Err(e) => {
                audit.record_error(Phase::Check, "failed to resolve access credentials", &e);
                return Err(e);
            }
        };
        audit.record(Phase::Check, "access credentials resolved");

        let decision = self.policy.decide(&config, Utc::now());
        debug!(domain = %config.domain, decision = ?decision, "Renewal decision made");

        if decision == RenewalDecision::SkipAll {
            audit.record_complete(Phase::Check, "certificate valid and deployed, nothing to do");
            return Ok(RunOutcome::Skipped);
        }
        audit.record_complete(Phase::Check, "checks passed");

        let (bundle, renewed) = match decision {
            RenewalDecision::IssueAndDeploy => {
                if cancel.is_cancelled() {
                    let e = CertplaneError::cancelled("issuance");
                    audit.record_error(Phase::Apply, "run cancelled", &e);
                    return Err(e);
                }
                audit.record(Phase::Apply, "starting issuance");

                let factory = match self.registry.issuance_factory(&config.issuance_method) {
                    Ok(factory) => factory,
                    Err(e) => {
                        audit.record_error(Phase::Apply, "no issuance provider available", &e);
                        return Err(e);
                    }
                };
                let provider = match factory.create(&config, resolved.access.as_ref()) {
                    Ok(provider) => provider,
                    Err(e) => {
                        audit.record_error(
                            Phase::Apply,
                            "failed to configure issuance provider",
                            &e,
                        );
                        return Err(e);
                    }
                };

                let bundle = match provider.apply(cancel).await {
                    Ok(bundle) => bundle,
                    Err(e) => {
                        audit.record_error(Phase::Apply, "certificate issuance failed", &e);
                        return Err(e);
                    }
                };
                audit.record(Phase::Apply, "certificate issued");

                let expires_at = Utc::now() + self.validity;
                if let Err(e) =
                    self.domain_configs.save_certificate(&config.id, &bundle, expires_at).await
                {
                    audit.record_error(Phase::Apply, "failed to persist certificate", &e);
                    return Err(e);
                }
                audit.record_complete(Phase::Apply, "certificate persisted");

                (bundle, true)
            }
            RenewalDecision::DeployOnly => match config.certificate.clone() {
                Some(bundle) => {
                    audit.record_complete(Phase::Apply, "certificate still valid, skipping issuance");
                    (bundle, false)
                }
                None => {
                    // Unreachable while the policy requires material for
                    // DeployOnly; kept as a hard error rather than a panic.
                    let e = CertplaneError::internal(
                        "certificate material missing after validity check",
                    );
                    audit.record_error(Phase::Apply, "certificate material unavailable", &e);
                    return Err(e);
                }
            },
            RenewalDecision::SkipAll => unreachable!("handled above"),
        };

        if cancel.is_cancelled() {
            let e = CertplaneError::cancelled("deployment");
            audit.record_error(Phase::Deploy, "run cancelled", &e);
            return Err(e);
        }
        audit.record(Phase::Deploy, "starting deployment");

        let factory = match self.registry.deployment_factory(&config.deploy_target) {
            Ok(factory) => factory,
            Err(e) => {
                audit.record_error(Phase::Deploy, "no deployment provider available", &e);
                return Err(e);
            }
        };
        let provider = match factory.create(&config, &bundle, resolved.target_access.as_ref()) {
            Ok(provider) => provider,
            Err(e) => {
                audit.record_error(Phase::Deploy, "failed to configure deployment provider", &e);
                return Err(e);
            }
        };

        if let Err(e) = provider.deploy(cancel).await {
            audit.record_error(Phase::Deploy, "deployment failed", &e);
            // A failed push must never stay recorded as deployed, whatever
            // the flag said before this run.
            if let Err(flag_error) = self.domain_configs.set_deployed(&config.id, false).await {
                error!(
                    domain = %config.domain,
                    error = %flag_error,
                    "Failed to clear deployed flag after deployment failure"
                );
                audit.record_error(Phase::Deploy, "failed to record deployment state", &flag_error);
            }
            return Err(e);
        }

        if let Err(e) = self.domain_configs.set_deployed(&config.id, true).await {
            audit.record_error(Phase::Deploy, "failed to record deployment state", &e);
            return Err(e);
        }
        audit.record_complete(Phase::Deploy, "deployment succeeded");

        Ok(if renewed { RunOutcome::Renewed } else { RunOutcome::Redeployed })
    }
}

impl fmt::Debug for RenewalWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenewalWorkflow")
            .field("policy", &self.policy)
            .field("validity", &self.validity)
            .field("registry", &self.registry)
            .finish()
    }
}
