//! Workflow run log repository.
//!
//! This module persists the per-run audit trail: one summary row per run and
//! its ordered, phase-tagged entries. A run and its entries are committed in
//! a single transaction, exactly once, after the run has finished.

use crate::domain::{AuditEntry, DomainConfigId, Phase, RunId, RunRecord};
use crate::errors::{CertplaneError, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use sqlx::FromRow;
use std::str::FromStr;
use tracing::instrument;

use super::parse_timestamp;

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(Debug, Clone, FromRow)]
struct RunRow {
    id: String,
    domain_config_id: String,
    started_at: String,
    finished_at: String,
    succeeded: bool,
    error: Option<String>,
}

impl TryFrom<RunRow> for RunRecord {
    type Error = CertplaneError;

    fn try_from(row: RunRow) -> Result<Self> {
        Ok(RunRecord {
            id: RunId::from_string(row.id),
            domain_config_id: DomainConfigId::from_string(row.domain_config_id),
            started_at: parse_timestamp(&row.started_at)?,
            finished_at: parse_timestamp(&row.finished_at)?,
            succeeded: row.succeeded,
            error: row.error,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
struct EntryRow {
    phase: String,
    message: String,
    error: Option<String>,
    phase_complete: bool,
    recorded_at: String,
}

impl TryFrom<EntryRow> for AuditEntry {
    type Error = CertplaneError;

    fn try_from(row: EntryRow) -> Result<Self> {
        let phase = Phase::from_str(&row.phase).map_err(CertplaneError::validation)?;

        Ok(AuditEntry {
            phase,
            message: row.message,
            error: row.error,
            phase_complete: row.phase_complete,
            recorded_at: parse_timestamp(&row.recorded_at)?,
        })
    }
}

// ============================================================================
// Repository Trait
// ============================================================================

#[async_trait]
pub trait RunLogRepository: Send + Sync {
    /// Persist a finished run and its audit entries atomically.
    async fn record_run(&self, record: &RunRecord, entries: &[AuditEntry]) -> Result<()>;

    /// Get a run summary by ID.
    async fn get_run(&self, id: &RunId) -> Result<Option<RunRecord>>;

    /// List the audit entries of a run in recording order.
    async fn list_entries(&self, id: &RunId) -> Result<Vec<AuditEntry>>;

    /// List runs for a domain configuration, newest first.
    async fn list_runs_for_config(
        &self,
        domain_config_id: &DomainConfigId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RunRecord>>;
}

// ============================================================================
// SQLx Implementation
// ============================================================================

pub struct SqlxRunLogRepository {
    pool: DbPool,
}

impl SqlxRunLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RunLogRepository for SqlxRunLogRepository {
    #[instrument(skip(self, record, entries), fields(run_id = %record.id, entry_count = entries.len()), name = "db_record_run")]
    async fn record_run(&self, record: &RunRecord, entries: &[AuditEntry]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            CertplaneError::database(e, "Failed to start run log transaction".to_string())
        })?;

        sqlx::query(
            r#"
            INSERT INTO workflow_runs (
                id, domain_config_id, started_at, finished_at, succeeded, error
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.domain_config_id.as_str())
        .bind(record.started_at.to_rfc3339())
        .bind(record.finished_at.to_rfc3339())
        .bind(record.succeeded)
        .bind(record.error.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| CertplaneError::Database {
            source: e,
            context: format!("Failed to record workflow run: {}", record.id),
        })?;

        for (seq, entry) in entries.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO workflow_run_entries (
                    run_id, seq, phase, message, error, phase_complete, recorded_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(record.id.as_str())
            .bind(seq as i64)
            .bind(entry.phase.as_str())
            .bind(&entry.message)
            .bind(entry.error.as_deref())
            .bind(entry.phase_complete)
            .bind(entry.recorded_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| CertplaneError::Database {
                source: e,
                context: format!("Failed to record run entry {} for run: {}", seq, record.id),
            })?;
        }

        tx.commit().await.map_err(|e| {
            CertplaneError::database(e, "Failed to commit run log transaction".to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(run_id = %id), name = "db_get_run")]
    async fn get_run(&self, id: &RunId) -> Result<Option<RunRecord>> {
        let row = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT id, domain_config_id, started_at, finished_at, succeeded, error
            FROM workflow_runs
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CertplaneError::Database {
            source: e,
            context: format!("Failed to fetch workflow run: {}", id),
        })?;

        row.map(|r| r.try_into()).transpose()
    }

    #[instrument(skip(self), fields(run_id = %id), name = "db_list_run_entries")]
    async fn list_entries(&self, id: &RunId) -> Result<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT phase, message, error, phase_complete, recorded_at
            FROM workflow_run_entries
            WHERE run_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CertplaneError::Database {
            source: e,
            context: format!("Failed to list run entries for run: {}", id),
        })?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    #[instrument(skip(self), fields(domain_config_id = %domain_config_id, limit = limit, offset = offset), name = "db_list_runs_for_config")]
    async fn list_runs_for_config(
        &self,
        domain_config_id: &DomainConfigId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RunRecord>> {
        let rows = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT id, domain_config_id, started_at, finished_at, succeeded, error
            FROM workflow_runs
            WHERE domain_config_id = $1
            ORDER BY started_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(domain_config_id.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CertplaneError::Database {
            source: e,
            context: format!("Failed to list runs for domain config: {}", domain_config_id),
        })?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CreateDomainConfigRequest;
    use crate::storage::repositories::{DomainConfigRepository, SqlxDomainConfigRepository};
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> DbPool {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        crate::storage::migrations::run_migrations(&pool).await.expect("Failed to run migrations");

        pool
    }

    async fn create_test_config(pool: &DbPool) -> DomainConfigId {
        let repo = SqlxDomainConfigRepository::new(pool.clone());
        let config = repo
            .create(CreateDomainConfigRequest {
                domain: "example.com".to_string(),
                issuance_method: "aliyun".to_string(),
                deploy_target: "aliyun-cdn".to_string(),
                access_id: None,
                target_access_id: None,
            })
            .await
            .expect("create domain config");
        config.id
    }

    fn entry(phase: Phase, message: &str, complete: bool) -> AuditEntry {
        AuditEntry {
            phase,
            message: message.to_string(),
            error: None,
            phase_complete: complete,
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_record_and_fetch_run() {
        let pool = setup_test_db().await;
        let config_id = create_test_config(&pool).await;
        let repo = SqlxRunLogRepository::new(pool);

        let record = RunRecord {
            id: RunId::new(),
            domain_config_id: config_id,
            started_at: Utc::now(),
            finished_at: Utc::now(),
            succeeded: true,
            error: None,
        };
        let entries = vec![
            entry(Phase::Check, "starting checks", false),
            entry(Phase::Check, "checks passed", true),
        ];

        repo.record_run(&record, &entries).await.expect("record run");

        let fetched = repo.get_run(&record.id).await.expect("get run").expect("run exists");
        assert_eq!(fetched.id, record.id);
        assert!(fetched.succeeded);
        assert!(fetched.error.is_none());

        let stored_entries = repo.list_entries(&record.id).await.expect("list entries");
        assert_eq!(stored_entries.len(), 2);
        assert_eq!(stored_entries[0].message, "starting checks");
        assert!(!stored_entries[0].phase_complete);
        assert_eq!(stored_entries[1].message, "checks passed");
        assert!(stored_entries[1].phase_complete);
    }

    #[tokio::test]
    async fn test_entries_preserve_recording_order() {
        let pool = setup_test_db().await;
        let config_id = create_test_config(&pool).await;
        let repo = SqlxRunLogRepository::new(pool);

        let record = RunRecord {
            id: RunId::new(),
            domain_config_id: config_id,
            started_at: Utc::now(),
            finished_at: Utc::now(),
            succeeded: false,
            error: Some("deployment failed".to_string()),
        };
        let entries = vec![
            entry(Phase::Check, "starting checks", false),
            entry(Phase::Check, "checks passed", true),
            entry(Phase::Apply, "certificate still valid, skipping issuance", true),
            entry(Phase::Deploy, "starting deployment", false),
            AuditEntry {
                phase: Phase::Deploy,
                message: "deployment failed".to_string(),
                error: Some("connection refused".to_string()),
                phase_complete: false,
                recorded_at: Utc::now(),
            },
        ];

        repo.record_run(&record, &entries).await.expect("record run");

        let stored = repo.list_entries(&record.id).await.expect("list entries");
        let phases: Vec<Phase> = stored.iter().map(|e| e.phase).collect();
        assert_eq!(
            phases,
            vec![Phase::Check, Phase::Check, Phase::Apply, Phase::Deploy, Phase::Deploy]
        );
        assert_eq!(stored[4].error.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_get_missing_run() {
        let pool = setup_test_db().await;
        let repo = SqlxRunLogRepository::new(pool);

        let fetched = repo.get_run(&RunId::new()).await.expect("get run");
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_list_runs_for_config() {
        let pool = setup_test_db().await;
        let config_id = create_test_config(&pool).await;
        let repo = SqlxRunLogRepository::new(pool);

        for i in 0..3 {
            let record = RunRecord {
                id: RunId::new(),
                domain_config_id: config_id.clone(),
                started_at: Utc::now() - chrono::Duration::minutes(10 - i),
                finished_at: Utc::now(),
                succeeded: true,
                error: None,
            };
            repo.record_run(&record, &[]).await.expect("record run");
        }

        let runs = repo.list_runs_for_config(&config_id, 10, 0).await.expect("list runs");
        assert_eq!(runs.len(), 3);
        // Newest first
        assert!(runs[0].started_at >= runs[1].started_at);
        assert!(runs[1].started_at >= runs[2].started_at);
    }
}
