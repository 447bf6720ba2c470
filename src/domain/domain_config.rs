//! Domain configuration entity
//!
//! A domain configuration is the unit the renewal workflow operates on: the
//! domain name, how its certificate gets issued, where it gets deployed, the
//! credential references both steps need, and the material from the most
//! recent successful issuance.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::certificate::CertificateBundle;
use super::id::{AccessConfigId, DomainConfigId};

/// A managed domain and its current certificate state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    pub id: DomainConfigId,
    /// Domain name the certificate covers
    pub domain: String,
    /// Issuance provider identifier (e.g. `aliyun`, `cloudflare`)
    ///
    /// Kept as a string so configurations with identifiers this build does
    /// not recognize still load; resolution happens when issuance starts.
    pub issuance_method: String,
    /// Deployment provider identifier (e.g. `aliyun-cdn`, `ssh`)
    pub deploy_target: String,
    /// Credentials used during issuance (DNS provider account)
    pub access_id: Option<AccessConfigId>,
    /// Credentials used during deployment (target platform account)
    pub target_access_id: Option<AccessConfigId>,
    /// Material from the most recent successful issuance, if any
    pub certificate: Option<CertificateBundle>,
    /// Expiry of the stored certificate
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the stored certificate has been pushed to the deploy target
    pub deployed: bool,
    /// Disabled configurations are excluded from listings, not from runs
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DomainConfig {
    /// Whether stored material exists and remains valid past `now + margin`.
    ///
    /// Missing material, an absent expiry, or an expiry inside the margin all
    /// count as invalid. The comparison is strict: a certificate expiring
    /// exactly at the margin boundary is due for renewal.
    pub fn certificate_valid_beyond(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        let has_leaf = self
            .certificate
            .as_ref()
            .map(CertificateBundle::has_leaf)
            .unwrap_or(false);
        match (has_leaf, self.expires_at) {
            (true, Some(expires_at)) => expires_at - now > margin,
            _ => false,
        }
    }
}

/// Request payload for creating a domain configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDomainConfigRequest {
    #[validate(length(min = 1, message = "Domain name is required"))]
    pub domain: String,
    #[validate(length(min = 1, message = "Issuance method is required"))]
    pub issuance_method: String,
    #[validate(length(min = 1, message = "Deploy target is required"))]
    pub deploy_target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_id: Option<AccessConfigId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_access_id: Option<AccessConfigId>,
}
