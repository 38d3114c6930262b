//! Fan-out of a published devotional to push devices and the in-app feed.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use db::{
    DBService,
    models::{
        devotional::Devotional,
        notification::{Notification, NotificationType},
        profile::Profile,
        subscription::PushSubscription,
    },
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Error)]
pub enum PushError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("push relay returned {status}")]
    Http { status: u16 },
    #[error("push relay not configured")]
    NotConfigured,
}

/// Payload delivered to each registered device.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub url: String,
    pub user_id: Option<Uuid>,
}

/// Transport for web-push messages.
#[async_trait]
pub trait PushDelivery: Send + Sync {
    /// False when the transport has nowhere to deliver to.
    fn enabled(&self) -> bool {
        true
    }

    async fn send(
        &self,
        subscription: &serde_json::Value,
        payload: &PushPayload,
    ) -> Result<(), PushError>;
}

/// Hands messages to an external web-push relay over HTTP. Without a
/// configured relay URL the transport reports itself disabled.
pub struct HttpPushRelay {
    http: Client,
    relay_url: Option<String>,
}

impl HttpPushRelay {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(relay_url: Option<String>) -> Result<Self, PushError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PushError::Transport(e.to_string()))?;
        Ok(Self { http, relay_url })
    }
}

#[async_trait]
impl PushDelivery for HttpPushRelay {
    fn enabled(&self) -> bool {
        self.relay_url.is_some()
    }

    async fn send(
        &self,
        subscription: &serde_json::Value,
        payload: &PushPayload,
    ) -> Result<(), PushError> {
        let Some(url) = self.relay_url.as_deref() else {
            return Err(PushError::NotConfigured);
        };

        let res = self
            .http
            .post(url)
            .json(&serde_json::json!({
                "subscription": subscription,
                "payload": payload,
            }))
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;

        if res.status().is_success() {
            Ok(())
        } else {
            Err(PushError::Http {
                status: res.status().as_u16(),
            })
        }
    }
}

const PUSH_TITLE: &str = "오늘의 큐티";
const PUSH_URL: &str = "/qt";

/// Announces a published devotional to every member.
pub struct NotificationService {
    db: DBService,
    push: Arc<dyn PushDelivery>,
}

impl NotificationService {
    pub fn new(db: DBService, push: Arc<dyn PushDelivery>) -> Self {
        Self { db, push }
    }

    /// Best-effort fan-out. Every failure in here is logged and dropped;
    /// the publish that triggered it has already succeeded.
    pub async fn broadcast_daily_qt(&self, devotional: &Devotional) {
        let line = format!("{} {}", devotional.date, devotional.reference);
        self.push_to_devices(&line).await;
        self.write_feed(&line).await;
    }

    async fn push_to_devices(&self, line: &str) {
        if !self.push.enabled() {
            debug!("push delivery disabled, skipping device fan-out");
            return;
        }

        let subscriptions = match PushSubscription::find_all(&self.db.pool).await {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                warn!(error = %e, "could not load push subscriptions");
                return;
            }
        };

        let sends = subscriptions.iter().map(|subscription| {
            let payload = PushPayload {
                title: PUSH_TITLE.to_string(),
                body: line.to_string(),
                url: PUSH_URL.to_string(),
                user_id: subscription.user_id,
            };
            async move {
                let result = self.push.send(&subscription.subscription, &payload).await;
                if let Err(e) = &result {
                    warn!(endpoint = %subscription.endpoint, error = %e, "push delivery failed");
                }
                result.is_ok()
            }
        });

        let results = futures::future::join_all(sends).await;
        let delivered = results.iter().filter(|ok| **ok).count();
        let failed = results.len() - delivered;
        info!(delivered, failed, "push fan-out finished");
    }

    async fn write_feed(&self, line: &str) {
        let user_ids = match Profile::all_ids(&self.db.pool).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "could not load profile ids");
                return;
            }
        };

        match Notification::create_for_users(
            &self.db.pool,
            &user_ids,
            NotificationType::DailyQt,
            line,
        )
        .await
        {
            Ok(rows) => info!(rows, "notification feed written"),
            Err(e) => warn!(error = %e, "notification feed insert failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{NaiveDate, Utc};
    use tokio::sync::Mutex;

    async fn test_db() -> (DBService, tempfile::NamedTempFile) {
        let file = tempfile::NamedTempFile::new().unwrap();
        let url = format!("sqlite://{}", file.path().display());
        (DBService::new(&url).await.unwrap(), file)
    }

    fn published(date: NaiveDate, reference: &str) -> Devotional {
        Devotional {
            id: Uuid::new_v4(),
            date,
            reference: reference.to_string(),
            scripture: "1 여호와는 나의 목자시니".to_string(),
            interpretation: "해설".to_string(),
            question1: "질문1".to_string(),
            question2: "질문2".to_string(),
            question3: "질문3".to_string(),
            prayer: "기도".to_string(),
            ai_generated: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct FailingPush;

    #[async_trait]
    impl PushDelivery for FailingPush {
        async fn send(
            &self,
            _subscription: &serde_json::Value,
            _payload: &PushPayload,
        ) -> Result<(), PushError> {
            Err(PushError::Transport("connection refused".to_string()))
        }
    }

    struct RecordingPush {
        sent: AtomicUsize,
        payloads: Mutex<Vec<PushPayload>>,
    }

    impl RecordingPush {
        fn new() -> Self {
            Self {
                sent: AtomicUsize::new(0),
                payloads: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PushDelivery for RecordingPush {
        async fn send(
            &self,
            _subscription: &serde_json::Value,
            payload: &PushPayload,
        ) -> Result<(), PushError> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            self.payloads.lock().await.push(payload.clone());
            Ok(())
        }
    }

    fn browser_subscription(endpoint: &str) -> serde_json::Value {
        serde_json::json!({ "endpoint": endpoint, "keys": { "p256dh": "k", "auth": "a" } })
    }

    #[tokio::test]
    async fn delivers_one_payload_per_device_with_date_and_reference() {
        let (db, _file) = test_db().await;
        let owner = Profile::create(&db.pool, Uuid::new_v4(), "김성도").await.unwrap();
        PushSubscription::create_or_update(
            &db.pool,
            Some(owner.id),
            "https://push.example/device-1",
            &browser_subscription("https://push.example/device-1"),
        )
        .await
        .unwrap();
        PushSubscription::create_or_update(
            &db.pool,
            None,
            "https://push.example/device-2",
            &browser_subscription("https://push.example/device-2"),
        )
        .await
        .unwrap();

        let push = Arc::new(RecordingPush::new());
        let service = NotificationService::new(db.clone(), push.clone());
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        service.broadcast_daily_qt(&published(date, "시편 23:1-3")).await;

        assert_eq!(push.sent.load(Ordering::SeqCst), 2);
        let payloads = push.payloads.lock().await;
        assert!(payloads.iter().all(|p| p.body == "2024-06-01 시편 23:1-3"));
        assert!(payloads.iter().any(|p| p.user_id == Some(owner.id)));
        assert!(payloads.iter().any(|p| p.user_id.is_none()));
    }

    #[tokio::test]
    async fn failing_push_still_writes_the_feed() {
        let (db, _file) = test_db().await;
        let a = Profile::create(&db.pool, Uuid::new_v4(), "김성도").await.unwrap();
        let b = Profile::create(&db.pool, Uuid::new_v4(), "이성도").await.unwrap();
        PushSubscription::create_or_update(
            &db.pool,
            Some(a.id),
            "https://push.example/device-1",
            &browser_subscription("https://push.example/device-1"),
        )
        .await
        .unwrap();

        let service = NotificationService::new(db.clone(), Arc::new(FailingPush));
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        service.broadcast_daily_qt(&published(date, "시편 23:1-3")).await;

        for user in [a.id, b.id] {
            let feed = Notification::find_by_user(&db.pool, user, 10).await.unwrap();
            assert_eq!(feed.len(), 1);
            assert_eq!(feed[0].actor_name.as_deref(), Some("2024-06-01 시편 23:1-3"));
        }
    }

    #[tokio::test]
    async fn unconfigured_relay_skips_devices_but_feeds_members() {
        let (db, _file) = test_db().await;
        let member = Profile::create(&db.pool, Uuid::new_v4(), "박성도").await.unwrap();

        let relay = Arc::new(HttpPushRelay::new(None).unwrap());
        assert!(!relay.enabled());

        let service = NotificationService::new(db.clone(), relay);
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        service.broadcast_daily_qt(&published(date, "다니엘 3:13-28")).await;

        let feed = Notification::find_by_user(&db.pool, member.id, 10).await.unwrap();
        assert_eq!(feed.len(), 1);
    }
}
