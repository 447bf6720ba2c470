//! Provider registry
//!
//! Holds the issuance and deployment provider factories an embedder has
//! registered and resolves them from the identifier strings stored on
//! domain configurations.

use super::deployment::{DeployTarget, DeploymentProviderFactory};
use super::issuance::{IssuanceMethod, IssuanceProviderFactory};
use crate::errors::{CertplaneError, ProviderKind, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Registry of issuance and deployment provider factories
///
/// A configuration names its providers as free-form strings; nothing checks
/// them at load time. Resolution happens here, when a run actually needs the
/// provider, and an unknown or unregistered identifier surfaces as a
/// provider-resolution error on that run.
pub struct ProviderRegistry {
    issuance: HashMap<IssuanceMethod, Arc<dyn IssuanceProviderFactory>>,
    deployment: HashMap<DeployTarget, Arc<dyn DeploymentProviderFactory>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("issuance", &self.issuance.keys().collect::<Vec<_>>())
            .field("deployment", &self.deployment.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ProviderRegistry {
    /// Create a new registry with no factories
    pub fn new() -> Self {
        Self { issuance: HashMap::new(), deployment: HashMap::new() }
    }

    /// Register an issuance provider factory
    pub fn register_issuance(&mut self, factory: Arc<dyn IssuanceProviderFactory>) {
        let method = factory.method();
        info!(method = %method, "Registering issuance provider factory");
        self.issuance.insert(method, factory);
    }

    /// Register a deployment provider factory
    pub fn register_deployment(&mut self, factory: Arc<dyn DeploymentProviderFactory>) {
        let target = factory.target();
        info!(target = %target, "Registering deployment provider factory");
        self.deployment.insert(target, factory);
    }

    /// Check if an issuance factory is registered for a method
    pub fn has_issuance(&self, method: IssuanceMethod) -> bool {
        self.issuance.contains_key(&method)
    }

    /// Check if a deployment factory is registered for a target
    pub fn has_deployment(&self, target: DeployTarget) -> bool {
        self.deployment.contains_key(&target)
    }

    /// Get list of registered issuance methods
    pub fn registered_issuance_methods(&self) -> Vec<IssuanceMethod> {
        self.issuance.keys().copied().collect()
    }

    /// Get list of registered deploy targets
    pub fn registered_deploy_targets(&self) -> Vec<DeployTarget> {
        self.deployment.keys().copied().collect()
    }

    /// Resolve an issuance factory from a configuration's method string
    ///
    /// Fails with a provider-resolution error when the identifier is not a
    /// known method, or is known but has no registered factory.
    pub fn issuance_factory(&self, identifier: &str) -> Result<Arc<dyn IssuanceProviderFactory>> {
        let method = identifier
            .parse::<IssuanceMethod>()
            .map_err(|_| CertplaneError::provider_resolution(ProviderKind::Issuance, identifier))?;

        self.issuance
            .get(&method)
            .cloned()
            .ok_or_else(|| CertplaneError::provider_resolution(ProviderKind::Issuance, identifier))
    }

    /// Resolve a deployment factory from a configuration's target string
    ///
    /// Same resolution semantics as [`Self::issuance_factory`].
    pub fn deployment_factory(&self, identifier: &str) -> Result<Arc<dyn DeploymentProviderFactory>> {
        let target = identifier
            .parse::<DeployTarget>()
            .map_err(|_| CertplaneError::provider_resolution(ProviderKind::Deployment, identifier))?;

        self.deployment
            .get(&target)
            .cloned()
            .ok_or_else(|| CertplaneError::provider_resolution(ProviderKind::Deployment, identifier))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ProviderRegistry {
    fn clone(&self) -> Self {
        Self { issuance: self.issuance.clone(), deployment: self.deployment.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccessConfig, CertificateBundle, DomainConfig};
    use crate::providers::deployment::DeploymentProvider;
    use crate::providers::issuance::IssuanceProvider;
    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    #[derive(Debug)]
    struct StubIssuanceFactory;

    struct StubIssuance;

    #[async_trait]
    impl IssuanceProvider for StubIssuance {
        async fn apply(&self, _cancel: &CancellationToken) -> crate::errors::Result<CertificateBundle> {
            Ok(CertificateBundle {
                cert_url: "https://ca.test/cert/1".to_string(),
                cert_stable_url: "https://ca.test/cert/1/stable".to_string(),
                private_key: "key".to_string(),
                certificate: "cert".to_string(),
                issuer_certificate: "issuer".to_string(),
                csr: "csr".to_string(),
            })
        }
    }

    impl IssuanceProviderFactory for StubIssuanceFactory {
        fn method(&self) -> IssuanceMethod {
            IssuanceMethod::Cloudflare
        }

        fn create(
            &self,
            _config: &DomainConfig,
            _access: Option<&AccessConfig>,
        ) -> crate::errors::Result<Box<dyn IssuanceProvider>> {
            Ok(Box::new(StubIssuance))
        }
    }

    #[derive(Debug)]
    struct StubDeploymentFactory;

    struct StubDeployment;

    #[async_trait]
    impl DeploymentProvider for StubDeployment {
        async fn deploy(&self, _cancel: &CancellationToken) -> crate::errors::Result<()> {
            Ok(())
        }
    }

    impl DeploymentProviderFactory for StubDeploymentFactory {
        fn target(&self) -> DeployTarget {
            DeployTarget::Local
        }

        fn create(
            &self,
            _config: &DomainConfig,
            _bundle: &CertificateBundle,
            _access: Option<&AccessConfig>,
        ) -> crate::errors::Result<Box<dyn DeploymentProvider>> {
            Ok(Box::new(StubDeployment))
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = ProviderRegistry::new();
        assert!(registry.registered_issuance_methods().is_empty());
        assert!(registry.registered_deploy_targets().is_empty());
    }

    #[test]
    fn test_register_and_lookup_issuance() {
        let mut registry = ProviderRegistry::new();
        assert!(!registry.has_issuance(IssuanceMethod::Cloudflare));

        registry.register_issuance(Arc::new(StubIssuanceFactory));

        assert!(registry.has_issuance(IssuanceMethod::Cloudflare));
        assert!(registry.issuance_factory("cloudflare").is_ok());
    }

    #[test]
    fn test_register_and_lookup_deployment() {
        let mut registry = ProviderRegistry::new();
        registry.register_deployment(Arc::new(StubDeploymentFactory));

        assert!(registry.has_deployment(DeployTarget::Local));
        assert!(registry.deployment_factory("local").is_ok());
    }

    #[test]
    fn test_unknown_identifier_fails_resolution() {
        let registry = ProviderRegistry::new();
        let err = registry.issuance_factory("carrier-pigeon").unwrap_err();
        assert!(err.to_string().contains("carrier-pigeon"));
        assert!(err.to_string().contains("issuance"));
    }

    #[test]
    fn test_known_but_unregistered_identifier_fails_resolution() {
        let registry = ProviderRegistry::new();
        // "aliyun" parses fine but nothing is registered for it.
        let err = registry.issuance_factory("aliyun").unwrap_err();
        assert!(matches!(err, CertplaneError::ProviderResolution { .. }));

        let err = registry.deployment_factory("webhook").unwrap_err();
        assert!(matches!(err, CertplaneError::ProviderResolution { .. }));
    }

    #[test]
    fn test_registry_debug_lists_keys() {
        let mut registry = ProviderRegistry::new();
        registry.register_issuance(Arc::new(StubIssuanceFactory));
        registry.register_deployment(Arc::new(StubDeploymentFactory));

        let debug_output = format!("{:?}", registry);
        assert!(debug_output.contains("Cloudflare"));
        assert!(debug_output.contains("Local"));
    }

    #[test]
    fn test_registry_clone_keeps_factories() {
        let mut registry = ProviderRegistry::new();
        registry.register_issuance(Arc::new(StubIssuanceFactory));

        let cloned = registry.clone();
        assert!(cloned.has_issuance(IssuanceMethod::Cloudflare));
    }
}
