//! PostgreSQL-backed audit store.
//!
//! Owns a pool separate from the entity store. The pool's `search_path`
//! selects the audit namespace, so queries name `audit_logs` unqualified.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use tasktrail_application::AuditRecordRepository;
use tasktrail_core::{AppError, AppResult};
use tasktrail_domain::{AuditRecord, AuditRecordId, NewAuditRecord};

/// Append-only PostgreSQL implementation of the audit record port.
#[derive(Clone)]
pub struct PostgresAuditRecordRepository {
    pool: PgPool,
}

impl PostgresAuditRecordRepository {
    /// Creates a repository with the audit store's connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRecordRepository for PostgresAuditRecordRepository {
    async fn append_record(&self, record: NewAuditRecord) -> AppResult<AuditRecord> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO audit_logs (user_id, action, entity, entity_id, timestamp, meta)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(record.user_id())
        .bind(record.action().as_str())
        .bind(record.entity())
        .bind(record.entity_id())
        .bind(record.timestamp())
        .bind(Json(record.meta()))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append audit record: {error}")))?;

        Ok(record.into_record(AuditRecordId::from_uuid(id)))
    }
}
