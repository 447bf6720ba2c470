//! Access configuration repository.
//!
//! This module provides CRUD operations for access configurations plus the
//! reference expansion the renewal workflow runs during its check phase:
//! resolving a domain configuration's credential references into full
//! records, collecting every broken reference instead of stopping at the
//! first.

use crate::domain::{
    AccessConfig, AccessConfigId, CreateAccessConfigRequest, DomainConfig, ResolvedAccess,
};
use crate::errors::{CertplaneError, ExpandFailure, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use tracing::instrument;
use validator::Validate;

use super::parse_timestamp;

// ============================================================================
// Database Row Type
// ============================================================================

#[derive(Debug, Clone, FromRow)]
struct AccessConfigRow {
    id: String,
    name: String,
    provider: String,
    credentials: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<AccessConfigRow> for AccessConfig {
    type Error = CertplaneError;

    fn try_from(row: AccessConfigRow) -> Result<Self> {
        let credentials = serde_json::from_str(&row.credentials).map_err(|e| {
            CertplaneError::Serialization {
                source: e,
                context: format!("Invalid credentials JSON for access config: {}", row.id),
            }
        })?;
        let created_at = parse_timestamp(&row.created_at)?;
        let updated_at = parse_timestamp(&row.updated_at)?;

        Ok(AccessConfig {
            id: AccessConfigId::from_string(row.id),
            name: row.name,
            provider: row.provider,
            credentials,
            created_at,
            updated_at,
        })
    }
}

// ============================================================================
// Repository Trait
// ============================================================================

#[async_trait]
pub trait AccessConfigRepository: Send + Sync {
    /// Create a new access configuration.
    async fn create(&self, request: CreateAccessConfigRequest) -> Result<AccessConfig>;

    /// Get an access configuration by ID.
    async fn get_by_id(&self, id: &AccessConfigId) -> Result<Option<AccessConfig>>;

    /// List access configurations.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<AccessConfig>>;

    /// Delete an access configuration.
    async fn delete(&self, id: &AccessConfigId) -> Result<()>;

    /// Resolve the credential references of a domain configuration.
    ///
    /// Both relations are attempted even when the first fails; the error
    /// carries one failure per broken reference. A relation the
    /// configuration does not use resolves to `None`.
    async fn expand_access(&self, config: &DomainConfig) -> Result<ResolvedAccess>;
}

// ============================================================================
// SQLx Implementation
// ============================================================================

pub struct SqlxAccessConfigRepository {
    pool: DbPool,
}

impl SqlxAccessConfigRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn resolve_relation(
        &self,
        relation: &str,
        id: Option<&AccessConfigId>,
        failures: &mut Vec<ExpandFailure>,
    ) -> Option<AccessConfig> {
        let id = id?;
        match self.get_by_id(id).await {
            Ok(Some(access)) => Some(access),
            Ok(None) => {
                failures.push(ExpandFailure {
                    relation: relation.to_string(),
                    reason: format!("access config '{}' not found", id),
                });
                None
            }
            Err(e) => {
                failures.push(ExpandFailure {
                    relation: relation.to_string(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }
}

#[async_trait]
impl AccessConfigRepository for SqlxAccessConfigRepository {
    #[instrument(skip(self, request), fields(name = %request.name, provider = %request.provider), name = "db_create_access_config")]
    async fn create(&self, request: CreateAccessConfigRequest) -> Result<AccessConfig> {
        request.validate().map_err(CertplaneError::from)?;

        let id = AccessConfigId::new();
        let credentials_json = serde_json::to_string(&request.credentials).map_err(|err| {
            CertplaneError::validation(format!("Invalid credentials JSON: {}", err))
        })?;
        let now = Utc::now().to_rfc3339();

        let row = sqlx::query_as::<_, AccessConfigRow>(
            r#"
            INSERT INTO access_configs (id, name, provider, credentials, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id.as_str())
        .bind(&request.name)
        .bind(&request.provider)
        .bind(credentials_json)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CertplaneError::Database {
            source: e,
            context: "Failed to create access config".to_string(),
        })?;

        row.try_into()
    }

    #[instrument(skip(self), fields(id = %id), name = "db_get_access_config_by_id")]
    async fn get_by_id(&self, id: &AccessConfigId) -> Result<Option<AccessConfig>> {
        let row =
            sqlx::query_as::<_, AccessConfigRow>("SELECT * FROM access_configs WHERE id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| CertplaneError::Database {
                    source: e,
                    context: format!("Failed to fetch access config by ID: {}", id),
                })?;

        row.map(|r| r.try_into()).transpose()
    }

    #[instrument(skip(self), fields(limit = limit, offset = offset), name = "db_list_access_configs")]
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<AccessConfig>> {
        let rows = sqlx::query_as::<_, AccessConfigRow>(
            r#"
            SELECT * FROM access_configs
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CertplaneError::Database {
            source: e,
            context: "Failed to list access configs".to_string(),
        })?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    #[instrument(skip(self), fields(id = %id), name = "db_delete_access_config")]
    async fn delete(&self, id: &AccessConfigId) -> Result<()> {
        let result = sqlx::query("DELETE FROM access_configs WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| CertplaneError::Database {
                source: e,
                context: format!("Failed to delete access config: {}", id),
            })?;

        if result.rows_affected() == 0 {
            return Err(CertplaneError::not_found("AccessConfig", id.as_str()));
        }

        Ok(())
    }

    #[instrument(skip(self, config), fields(domain_config_id = %config.id), name = "db_expand_access")]
    async fn expand_access(&self, config: &DomainConfig) -> Result<ResolvedAccess> {
        let mut failures = Vec::new();

        let access = self
            .resolve_relation("access", config.access_id.as_ref(), &mut failures)
            .await;
        let target_access = self
            .resolve_relation("target_access", config.target_access_id.as_ref(), &mut failures)
            .await;

        if !failures.is_empty() {
            return Err(CertplaneError::expand(failures));
        }

        Ok(ResolvedAccess { access, target_access })
    }
}
