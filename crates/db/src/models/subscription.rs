use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// One registered push device. `subscription` is the browser's web-push
/// subscription object, stored opaquely; `endpoint` inside it identifies the
/// device and keys re-registrations.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PushSubscription {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub endpoint: String,
    pub subscription: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl PushSubscription {
    /// Register a device. Re-registering an endpoint updates the stored
    /// subscription (and owner) instead of growing the table.
    pub async fn create_or_update(
        pool: &SqlitePool,
        user_id: Option<Uuid>,
        endpoint: &str,
        subscription: &serde_json::Value,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as(
            r#"INSERT INTO push_subscriptions (id, user_id, endpoint, subscription)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(endpoint) DO UPDATE SET
                user_id = excluded.user_id,
                subscription = excluded.subscription
            RETURNING id, user_id, endpoint, subscription, created_at"#,
        )
        .bind(id)
        .bind(user_id)
        .bind(endpoint)
        .bind(subscription.clone())
        .fetch_one(pool)
        .await
    }

    pub async fn delete_by_endpoint(pool: &SqlitePool, endpoint: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM push_subscriptions WHERE endpoint = $1")
            .bind(endpoint)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT id, user_id, endpoint, subscription, created_at
            FROM push_subscriptions
            ORDER BY created_at"#,
        )
        .fetch_all(pool)
        .await
    }
}
