use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::model::notification::Notification;

/// Durable record of every notification, delivered or not.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persists a new unread notification and returns it with its id.
    async fn create(&self, user_id: &str, message: &str, kind: &str) -> StoreResult<Notification>;
}

fn new_notification(user_id: &str, message: &str, kind: &str) -> Notification {
    Notification {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        message: message.to_string(),
        kind: kind.to_string(),
        is_read: false,
        // DATETIME(6) keeps microseconds only
        created_at: Utc::now().trunc_subsecs(6),
    }
}

#[derive(Clone)]
pub struct MySqlNotificationStore {
    pool: MySqlPool,
}

impl MySqlNotificationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for MySqlNotificationStore {
    async fn create(&self, user_id: &str, message: &str, kind: &str) -> StoreResult<Notification> {
        let notification = new_notification(user_id, message, kind);

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, message, type, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&notification.id)
        .bind(&notification.user_id)
        .bind(&notification.message)
        .bind(&notification.kind)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(notification)
    }
}
