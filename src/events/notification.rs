use axum::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::store::StoreError;

/// A guest-facing message to be delivered by an external sender
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub recipient: String,
    pub channel: &'static str,
    pub template_key: &'static str,
    pub payload: JsonValue,
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), StoreError>;
}

/// Queues notifications in the `notifications` table with status Pending
pub struct PgNotificationSink {
    pool: PgPool,
}

impl PgNotificationSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for PgNotificationSink {
    async fn notify(&self, notification: &Notification) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (recipient, channel, template_key, payload, status)
            VALUES ($1, $2, $3, $4, 'Pending')
            "#,
        )
        .bind(&notification.recipient)
        .bind(notification.channel)
        .bind(notification.template_key)
        .bind(&notification.payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
