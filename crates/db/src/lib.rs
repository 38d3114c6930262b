use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

pub mod models;

#[cfg(test)]
pub(crate) mod test_support;

/// Tables are created up front so a fresh deployment starts from an empty
/// database file without a separate migration step.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS daily_devotionals (
    id             BLOB PRIMARY KEY,
    date           TEXT NOT NULL UNIQUE,
    reference      TEXT NOT NULL,
    scripture      TEXT NOT NULL,
    interpretation TEXT NOT NULL,
    question1      TEXT NOT NULL DEFAULT '',
    question2      TEXT NOT NULL DEFAULT '',
    question3      TEXT NOT NULL DEFAULT '',
    prayer         TEXT NOT NULL DEFAULT '',
    ai_generated   BOOLEAN NOT NULL DEFAULT 1,
    created_at     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS push_subscriptions (
    id           BLOB PRIMARY KEY,
    user_id      BLOB,
    endpoint     TEXT NOT NULL UNIQUE,
    subscription TEXT NOT NULL,
    created_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS profiles (
    id           BLOB PRIMARY KEY,
    display_name TEXT NOT NULL,
    created_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS notifications (
    id                BLOB PRIMARY KEY,
    user_id           BLOB NOT NULL REFERENCES profiles(id),
    notification_type TEXT NOT NULL,
    actor_name        TEXT,
    is_read           BOOLEAN NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_notifications_user_created
    ON notifications(user_id, created_at);
"#;

#[derive(Clone)]
pub struct DBService {
    pub pool: SqlitePool,
}

impl DBService {
    /// Open (creating if missing) the database at `database_url` and ensure
    /// the schema exists.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }
}
