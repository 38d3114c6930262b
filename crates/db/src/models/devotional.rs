use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Separator used by legacy clients that read scripture and interpretation
/// out of a single `passage` field.
pub const PASSAGE_DELIMITER: &str = "|||";

pub mod passage {
    use super::PASSAGE_DELIMITER;

    /// Legacy wire form: scripture and interpretation joined into one field.
    pub fn join(scripture: &str, interpretation: &str) -> String {
        format!("{scripture}{PASSAGE_DELIMITER}{interpretation}")
    }

    /// Split a joined passage back into (scripture, interpretation). Input
    /// without the delimiter is treated as scripture only.
    pub fn split(joined: &str) -> (String, String) {
        match joined.split_once(PASSAGE_DELIMITER) {
            Some((scripture, interpretation)) => {
                (scripture.to_string(), interpretation.to_string())
            }
            None => (joined.to_string(), String::new()),
        }
    }
}

/// One published devotional per calendar date (KST).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Devotional {
    pub id: Uuid,
    pub date: NaiveDate,
    pub reference: String,
    pub scripture: String,
    pub interpretation: String,
    pub question1: String,
    pub question2: String,
    pub question3: String,
    pub prayer: String,
    pub ai_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content for a publish; the row identity (id, timestamps) is assigned by
/// the upsert.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct NewDevotional {
    pub date: NaiveDate,
    pub reference: String,
    pub scripture: String,
    pub interpretation: String,
    pub question1: String,
    pub question2: String,
    pub question3: String,
    pub prayer: String,
    pub ai_generated: bool,
}

/// Client-facing record. `passage` carries the joined legacy form alongside
/// the split columns so older clients keep working unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct DevotionalPayload {
    pub id: Uuid,
    pub date: NaiveDate,
    pub reference: String,
    pub passage: String,
    pub scripture: String,
    pub interpretation: String,
    pub question1: String,
    pub question2: String,
    pub question3: String,
    pub prayer: String,
    pub ai_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Devotional> for DevotionalPayload {
    fn from(d: Devotional) -> Self {
        let passage = passage::join(&d.scripture, &d.interpretation);
        Self {
            id: d.id,
            date: d.date,
            reference: d.reference,
            passage,
            scripture: d.scripture,
            interpretation: d.interpretation,
            question1: d.question1,
            question2: d.question2,
            question3: d.question3,
            prayer: d.prayer,
            ai_generated: d.ai_generated,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl Devotional {
    pub async fn find_by_date(
        pool: &SqlitePool,
        date: NaiveDate,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT id, date, reference, scripture, interpretation,
                question1, question2, question3, prayer, ai_generated,
                created_at, updated_at
            FROM daily_devotionals
            WHERE date = $1"#,
        )
        .bind(date)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT id, date, reference, scripture, interpretation,
                question1, question2, question3, prayer, ai_generated,
                created_at, updated_at
            FROM daily_devotionals
            ORDER BY date DESC
            LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Publish a devotional for its date. A second publish for the same date
    /// replaces the content in place (last writer wins).
    pub async fn create_or_update(
        pool: &SqlitePool,
        data: &NewDevotional,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as(
            r#"INSERT INTO daily_devotionals
                (id, date, reference, scripture, interpretation,
                 question1, question2, question3, prayer, ai_generated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT(date) DO UPDATE SET
                reference = excluded.reference,
                scripture = excluded.scripture,
                interpretation = excluded.interpretation,
                question1 = excluded.question1,
                question2 = excluded.question2,
                question3 = excluded.question3,
                prayer = excluded.prayer,
                ai_generated = excluded.ai_generated,
                updated_at = CURRENT_TIMESTAMP
            RETURNING id, date, reference, scripture, interpretation,
                question1, question2, question3, prayer, ai_generated,
                created_at, updated_at"#,
        )
        .bind(id)
        .bind(data.date)
        .bind(&data.reference)
        .bind(&data.scripture)
        .bind(&data.interpretation)
        .bind(&data.question1)
        .bind(&data.question2)
        .bind(&data.question3)
        .bind(&data.prayer)
        .bind(data.ai_generated)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    fn sample(date: NaiveDate, reference: &str) -> NewDevotional {
        NewDevotional {
            date,
            reference: reference.to_string(),
            scripture: "1 여호와는 나의 목자시니 내게 부족함이 없으리로다".to_string(),
            interpretation: "목자이신 하나님을 신뢰하는 하루.".to_string(),
            question1: "오늘 나에게 부족하다고 느끼는 것은 무엇인가요?".to_string(),
            question2: "하나님을 목자로 신뢰한 경험이 있나요?".to_string(),
            question3: "오늘 맡겨드릴 염려는 무엇인가요?".to_string(),
            prayer: "선한 목자 되신 주님, 오늘도 인도해 주세요.".to_string(),
            ai_generated: true,
        }
    }

    #[test]
    fn passage_round_trips_through_the_legacy_form() {
        let joined = passage::join("본문 텍스트", "해설 텍스트");
        assert_eq!(joined, "본문 텍스트|||해설 텍스트");
        assert_eq!(
            passage::split(&joined),
            ("본문 텍스트".to_string(), "해설 텍스트".to_string())
        );
    }

    #[test]
    fn passage_split_without_delimiter_is_scripture_only() {
        let (scripture, interpretation) = passage::split("본문만 있는 옛 데이터");
        assert_eq!(scripture, "본문만 있는 옛 데이터");
        assert_eq!(interpretation, "");
    }

    #[test]
    fn payload_exposes_byte_identical_passage() {
        let d = Devotional {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            reference: "시편 23:1-3".to_string(),
            scripture: "1 여호와는 나의 목자시니".to_string(),
            interpretation: "해설".to_string(),
            question1: String::new(),
            question2: String::new(),
            question3: String::new(),
            prayer: String::new(),
            ai_generated: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let payload = DevotionalPayload::from(d.clone());
        assert_eq!(
            payload.passage.as_bytes(),
            format!("{}|||{}", d.scripture, d.interpretation).as_bytes()
        );
    }

    #[tokio::test]
    async fn upsert_keeps_one_row_per_date() {
        let (db, _file) = test_db().await;
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let first = Devotional::create_or_update(&db.pool, &sample(date, "시편 23:1-3"))
            .await
            .unwrap();
        let mut replacement = sample(date, "시편 23:1-3");
        replacement.interpretation = "다시 쓴 해설.".to_string();
        let second = Devotional::create_or_update(&db.pool, &replacement)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.interpretation, "다시 쓴 해설.");

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM daily_devotionals")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn find_recent_returns_newest_first_and_respects_limit() {
        let (db, _file) = test_db().await;
        for day in 1..=5 {
            let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
            Devotional::create_or_update(&db.pool, &sample(date, "시편 23:1-3"))
                .await
                .unwrap();
        }

        let recent = Devotional::find_recent(&db.pool, 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].date, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        assert_eq!(recent[2].date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[tokio::test]
    async fn find_by_date_misses_cleanly() {
        let (db, _file) = test_db().await;
        let missing = Devotional::find_by_date(&db.pool, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
