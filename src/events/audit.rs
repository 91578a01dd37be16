// Audit sink
//
// Records state changes to the audit trail. Callers never see a failure
// from here; the dispatcher logs and drops it.

use axum::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::store::StoreError;

/// One audit trail entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub action: &'static str,
    pub entity_type: &'static str,
    pub entity_id: i32,
    pub actor_id: i32,
    pub before_state: Option<JsonValue>,
    pub after_state: Option<JsonValue>,
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: &AuditRecord) -> Result<(), StoreError>;
}

/// Audit sink writing to the `audit_logs` table
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (action, entity_type, entity_id, actor_id, before_state, after_state)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.action)
        .bind(record.entity_type)
        .bind(record.entity_id)
        .bind(record.actor_id)
        .bind(&record.before_state)
        .bind(&record.after_state)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
