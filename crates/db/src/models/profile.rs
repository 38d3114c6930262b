use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Member profile. Account management lives in the member subsystem; this
/// service only needs the ids when fanning a devotional out to everyone.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        display_name: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r#"INSERT INTO profiles (id, display_name)
            VALUES ($1, $2)
            RETURNING id, display_name, created_at"#,
        )
        .bind(id)
        .bind(display_name)
        .fetch_one(pool)
        .await
    }

    pub async fn all_ids(pool: &SqlitePool) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM profiles")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn all_ids_returns_every_profile() {
        let (db, _file) = test_db().await;
        assert!(Profile::all_ids(&db.pool).await.unwrap().is_empty());

        let a = Profile::create(&db.pool, Uuid::new_v4(), "김성도").await.unwrap();
        let b = Profile::create(&db.pool, Uuid::new_v4(), "이성도").await.unwrap();

        let ids = Profile::all_ids(&db.pool).await.unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a.id));
        assert!(ids.contains(&b.id));
    }
}
