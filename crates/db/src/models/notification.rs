use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Event kind behind a notification row.
#[derive(Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationType {
    DailyQt,
    Comment,
    Like,
}

/// One unread/read feed entry for one member. For `daily_qt` events the
/// `actor_name` slot carries the date and reading reference rather than a
/// person's name; clients render it as the notification line.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub actor_name: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Insert one unread row per user in a single statement. Returns the
    /// number of rows written; an empty user list writes nothing.
    pub async fn create_for_users(
        pool: &SqlitePool,
        user_ids: &[Uuid],
        notification_type: NotificationType,
        actor_name: &str,
    ) -> Result<u64, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO notifications (id, user_id, notification_type, actor_name) ",
        );
        builder.push_values(user_ids, |mut row, user_id| {
            row.push_bind(Uuid::new_v4())
                .push_bind(*user_id)
                .push_bind(notification_type.clone())
                .push_bind(actor_name);
        });

        let result = builder.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn find_by_user(
        pool: &SqlitePool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        // rowid breaks same-second ties so the feed stays in insertion order.
        sqlx::query_as(
            r#"SELECT id, user_id, notification_type, actor_name, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, rowid DESC
            LIMIT $2"#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn mark_read(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"UPDATE notifications SET is_read = 1
            WHERE id = $1
            RETURNING id, user_id, notification_type, actor_name, is_read, created_at"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
