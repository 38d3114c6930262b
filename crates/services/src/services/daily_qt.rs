//! Daily devotional (QT) pipeline: guard, generate, publish, announce.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use db::{
    DBService,
    models::devotional::{Devotional, NewDevotional},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::{
    claude_api::{ClaudeApiClient, ClaudeApiError},
    notifier::NotificationService,
    reading_plan,
};

#[derive(Debug, Error)]
pub enum DailyQtError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("claude api error: {0}")]
    ClaudeApi(#[from] ClaudeApiError),
}

/// Draft content for one date, one field per published column.
#[derive(Debug, Clone)]
pub struct GeneratedDevotional {
    pub scripture: String,
    pub interpretation: String,
    pub question1: String,
    pub question2: String,
    pub question3: String,
    pub prayer: String,
}

/// Produces devotional content for a date and its reading.
#[async_trait]
pub trait DevotionalGenerator: Send + Sync {
    async fn generate(
        &self,
        date: NaiveDate,
        reference: &str,
    ) -> Result<GeneratedDevotional, DailyQtError>;
}

/// First call: the scripture text itself.
#[derive(Debug, Clone, Deserialize)]
struct ScriptureContent {
    #[serde(default)]
    scripture: String,
}

/// Second call: interpretation, three questions, prayer. Keys the model
/// leaves out are published as empty strings rather than failing the run.
#[derive(Debug, Clone, Deserialize)]
struct ReflectionContent {
    #[serde(default)]
    interpretation: String,
    #[serde(default)]
    question1: String,
    #[serde(default)]
    question2: String,
    #[serde(default)]
    question3: String,
    #[serde(default)]
    prayer: String,
}

/// Two-step Claude generator: quote the scripture at low temperature, then
/// compose the reflection on top of it at a higher one.
pub struct ClaudeGenerator {
    claude: ClaudeApiClient,
}

impl ClaudeGenerator {
    const SCRIPTURE_TEMPERATURE: f32 = 0.2;
    const REFLECTION_TEMPERATURE: f32 = 0.7;
    const MAX_TOKENS: u32 = 2048;

    pub fn new(claude: ClaudeApiClient) -> Self {
        Self { claude }
    }

    async fn fetch_scripture(&self, reference: &str) -> Result<String, ClaudeApiError> {
        let system = "당신은 성경 본문을 정확하게 인용하는 도우미입니다. \
            요청받은 구절의 개역개정 본문을 한 글자도 바꾸지 않고 그대로 제공합니다."
            .to_string();
        let prompt = format!(
            r#"{reference} 본문을 알려주세요.

- 각 절 앞에 절 번호를 붙이세요.
- 15~20절 분량을 정확히 인용하고, 같은 절을 반복하지 마세요.
- 본문을 새로 짓거나 바꿔 쓰지 마세요.

다른 설명 없이 아래 JSON 형식으로만 응답하세요:
{{"scripture": "..."}}"#
        );

        let content: ScriptureContent = self
            .claude
            .ask_json(
                &prompt,
                Some(system),
                Some(Self::SCRIPTURE_TEMPERATURE),
                Self::MAX_TOKENS,
            )
            .await?;
        Ok(content.scripture)
    }

    async fn compose_reflection(
        &self,
        reference: &str,
        scripture: &str,
    ) -> Result<ReflectionContent, ClaudeApiError> {
        let system =
            "당신은 교회 공동체의 매일 큐티(QT) 자료를 집필하는 작가입니다.".to_string();
        let prompt = format!(
            r#"오늘의 본문은 {reference}입니다.

본문:
{scripture}

위 본문으로 오늘의 큐티 자료를 작성해 주세요.

- interpretation: 본문의 의미와 오늘의 적용을 담은 해설 (400~600자)
- question1, question2, question3: 각자 묵상할 질문 3개
- prayer: 마무리 기도문

다른 설명 없이 아래 JSON 형식으로만 응답하세요:
{{"interpretation": "...", "question1": "...", "question2": "...", "question3": "...", "prayer": "..."}}"#
        );

        self.claude
            .ask_json(
                &prompt,
                Some(system),
                Some(Self::REFLECTION_TEMPERATURE),
                Self::MAX_TOKENS,
            )
            .await
    }
}

#[async_trait]
impl DevotionalGenerator for ClaudeGenerator {
    async fn generate(
        &self,
        date: NaiveDate,
        reference: &str,
    ) -> Result<GeneratedDevotional, DailyQtError> {
        info!(date = %date, reference = %reference, "fetching scripture text");
        let scripture = self.fetch_scripture(reference).await?;

        info!(
            date = %date,
            scripture_chars = scripture.chars().count(),
            "composing reflection"
        );
        let reflection = self.compose_reflection(reference, &scripture).await?;

        Ok(GeneratedDevotional {
            scripture,
            interpretation: reflection.interpretation,
            question1: reflection.question1,
            question2: reflection.question2,
            question3: reflection.question3,
            prayer: reflection.prayer,
        })
    }
}

/// What a trigger run did.
#[derive(Debug, Clone, PartialEq)]
pub enum CronOutcome {
    /// A row for the date already existed; nothing was generated.
    AlreadyPublished { date: NaiveDate },
    /// A fresh devotional was generated and published.
    Published { date: NaiveDate, reference: String },
}

/// Orchestrates one trigger run.
pub struct DailyQtService {
    db: DBService,
    generator: Arc<dyn DevotionalGenerator>,
    notifier: NotificationService,
}

impl DailyQtService {
    pub fn new(
        db: DBService,
        generator: Arc<dyn DevotionalGenerator>,
        notifier: NotificationService,
    ) -> Self {
        Self {
            db,
            generator,
            notifier,
        }
    }

    pub async fn run(&self, date: NaiveDate) -> Result<CronOutcome, DailyQtError> {
        if let Some(existing) = Devotional::find_by_date(&self.db.pool, date).await? {
            info!(date = %existing.date, "devotional already published, skipping generation");
            return Ok(CronOutcome::AlreadyPublished {
                date: existing.date,
            });
        }

        let reference = reading_plan::reference_for(date);
        let generated = self.generator.generate(date, reference).await?;

        let record = Devotional::create_or_update(
            &self.db.pool,
            &NewDevotional {
                date,
                reference: reference.to_string(),
                scripture: generated.scripture,
                interpretation: generated.interpretation,
                question1: generated.question1,
                question2: generated.question2,
                question3: generated.question3,
                prayer: generated.prayer,
                ai_generated: true,
            },
        )
        .await?;

        info!(date = %record.date, reference = %record.reference, "devotional published");

        // Fan-out runs strictly after the publish and cannot fail the run.
        self.notifier.broadcast_daily_qt(&record).await;

        Ok(CronOutcome::Published {
            date: record.date,
            reference: record.reference.clone(),
        })
    }
}
