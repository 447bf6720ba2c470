//! Access configuration entity
//!
//! Access configurations are named credential records shared across domain
//! configurations. The credential payload is a schemaless JSON document; the
//! provider consuming it validates the fields it needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::id::AccessConfigId;

/// A named, vendor-specific credential record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    pub id: AccessConfigId,
    /// Human-assigned label, e.g. "prod aliyun account"
    pub name: String,
    /// Vendor this credential belongs to, e.g. `aliyun`, `cloudflare`
    pub provider: String,
    /// Vendor-specific credential fields (API keys, secrets, regions)
    pub credentials: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating an access configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccessConfigRequest {
    #[validate(length(min = 1, message = "Access name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Provider is required"))]
    pub provider: String,
    #[serde(default)]
    pub credentials: serde_json::Value,
}

/// Access configurations resolved for one workflow run.
///
/// Built by reference expansion during the check phase. Either side is `None`
/// when the domain configuration simply does not reference a credential for
/// that step; a referenced-but-missing credential fails expansion instead.
#[derive(Debug, Clone, Default)]
pub struct ResolvedAccess {
    /// Credentials for the issuance step
    pub access: Option<AccessConfig>,
    /// Credentials for the deployment step
    pub target_access: Option<AccessConfig>,
}
