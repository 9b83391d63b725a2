//! Scripted price source and recording notifier

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use uuid::Uuid;
use price_tracker::config::Settings;
use price_tracker::database::{MemoryStore, PriceStore};
use price_tracker::models::{
    CreateSubscriptionRequest, Good, GoodInfo, PendingAlert, SubscribedGood, Subscription, User,
};
use price_tracker::services::{Notifier, PriceSource, ServiceFactory};
use price_tracker::utils::errors::{PriceTrackerError, Result, ScrapeError};

/// Price source whose answers are set by the test
#[derive(Default)]
pub struct ScriptedSource {
    goods: Mutex<HashMap<String, GoodInfo>>,
    broken: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn set_price(&self, good_id: &str, name: &str, price: i64) {
        self.goods.lock().unwrap().insert(good_id.to_string(), GoodInfo::new(good_id, name, price));
        self.broken.lock().unwrap().remove(good_id);
    }

    /// Make every fetch of `good_id` fail like a changed page layout
    pub fn break_page(&self, good_id: &str) {
        self.broken.lock().unwrap().insert(good_id.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn fetch_good(&self, good_id: &str) -> Result<GoodInfo> {
        self.calls.lock().unwrap().push(good_id.to_string());
        if self.broken.lock().unwrap().contains(good_id) {
            return Err(ScrapeError::ElementNotFound { selector: "#osmGoodsName".to_string() }.into());
        }
        self.goods
            .lock()
            .unwrap()
            .get(good_id)
            .cloned()
            .ok_or_else(|| ScrapeError::InvalidPrice(format!("no page for {}", good_id)).into())
    }
}

/// A message captured by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
}

/// Notifier that records deliveries and can refuse chosen chats
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMessage>>,
    unreachable: Mutex<HashSet<i64>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<SentMessage> {
        self.sent().into_iter().filter(|m| m.chat_id == chat_id).collect()
    }

    pub fn set_unreachable(&self, chat_id: i64, unreachable: bool) {
        let mut chats = self.unreachable.lock().unwrap();
        if unreachable {
            chats.insert(chat_id);
        } else {
            chats.remove(&chat_id);
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        if self.unreachable.lock().unwrap().contains(&chat_id) {
            return Err(PriceTrackerError::InvalidInput(format!("chat {} blocked the bot", chat_id)));
        }
        self.sent.lock().unwrap().push(SentMessage { chat_id, text: text.to_string() });
        Ok(())
    }
}

/// Services wired over in-memory fakes
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub source: Arc<ScriptedSource>,
    pub notifier: Arc<RecordingNotifier>,
    pub services: ServiceFactory,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_limit(10)
    }

    pub fn with_limit(limit: i64) -> Self {
        let mut settings = Settings::default();
        settings.subscription.max_per_user = limit;

        let store = Arc::new(MemoryStore::new());
        let source = Arc::new(ScriptedSource::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let services = ServiceFactory::with_components(
            &settings,
            store.clone() as Arc<dyn PriceStore>,
            source.clone() as Arc<dyn PriceSource>,
            notifier.clone() as Arc<dyn Notifier>,
        );

        Self { store, source, notifier, services }
    }

    /// Subscribe `user_id` (chatting from `user_id * 10`) at `recorded_price`
    pub async fn subscribe(&self, user_id: i64, good_id: &str, recorded_price: i64) {
        self.services
            .subscription_service
            .track(user_id, user_id * 10, good_id, Some(recorded_price))
            .await
            .expect("subscription should be accepted");
    }

    pub async fn is_notified(&self, user_id: i64, good_id: &str) -> bool {
        self.store
            .find_subscription(user_id, good_id)
            .await
            .unwrap()
            .expect("subscription should exist")
            .is_notified
    }
}

/// Memory store that deletes the good right before the next subscription
/// insert, like a sync pass running between `/add`'s upsert and insert
pub struct RacingStore {
    pub inner: Arc<MemoryStore>,
    drop_good_before_add: Mutex<bool>,
}

impl RacingStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self { inner, drop_good_before_add: Mutex::new(false) }
    }

    pub fn drop_good_before_next_add(&self) {
        *self.drop_good_before_add.lock().unwrap() = true;
    }
}

#[async_trait]
impl PriceStore for RacingStore {
    async fn upsert_user(&self, user_id: i64, chat_id: i64) -> Result<User> {
        self.inner.upsert_user(user_id, chat_id).await
    }

    async fn all_goods(&self) -> Result<Vec<Good>> {
        self.inner.all_goods().await
    }

    async fn find_good(&self, good_id: &str) -> Result<Option<Good>> {
        self.inner.find_good(good_id).await
    }

    async fn upsert_good(&self, info: &GoodInfo) -> Result<Good> {
        self.inner.upsert_good(info).await
    }

    async fn delete_good_if_unreferenced(&self, good_id: &str) -> Result<bool> {
        self.inner.delete_good_if_unreferenced(good_id).await
    }

    async fn add_subscription(&self, request: CreateSubscriptionRequest, limit: i64) -> Result<Subscription> {
        let drop_good = std::mem::take(&mut *self.drop_good_before_add.lock().unwrap());
        if drop_good {
            self.inner.delete_good_if_unreferenced(&request.good_id).await?;
        }
        self.inner.add_subscription(request, limit).await
    }

    async fn find_subscription(&self, user_id: i64, good_id: &str) -> Result<Option<Subscription>> {
        self.inner.find_subscription(user_id, good_id).await
    }

    async fn remove_subscription(&self, user_id: i64, good_id: &str) -> Result<bool> {
        self.inner.remove_subscription(user_id, good_id).await
    }

    async fn clear_subscriptions(&self, user_id: i64) -> Result<u64> {
        self.inner.clear_subscriptions(user_id).await
    }

    async fn list_subscriptions(&self, user_id: i64) -> Result<Vec<SubscribedGood>> {
        self.inner.list_subscriptions(user_id).await
    }

    async fn count_subscriptions(&self, user_id: i64) -> Result<i64> {
        self.inner.count_subscriptions(user_id).await
    }

    async fn has_subscriptions(&self, good_id: &str) -> Result<bool> {
        self.inner.has_subscriptions(good_id).await
    }

    async fn reset_notified(&self, good_id: &str) -> Result<u64> {
        self.inner.reset_notified(good_id).await
    }

    async fn find_pending_alerts(&self, good_id: &str, price: i64) -> Result<Vec<PendingAlert>> {
        self.inner.find_pending_alerts(good_id, price).await
    }

    async fn mark_notified(&self, subscription_ids: &[Uuid]) -> Result<u64> {
        self.inner.mark_notified(subscription_ids).await
    }
}

/// Price source that takes `delay` of (virtual) time per fetch and records
/// when each fetch started
pub struct SlowSource {
    inner: ScriptedSource,
    delay: std::time::Duration,
    started: tokio::time::Instant,
    fetch_starts: Mutex<Vec<std::time::Duration>>,
}

impl SlowSource {
    pub fn new(delay: std::time::Duration) -> Self {
        Self {
            inner: ScriptedSource::default(),
            delay,
            started: tokio::time::Instant::now(),
            fetch_starts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_price(&self, good_id: &str, name: &str, price: i64) {
        self.inner.set_price(good_id, name, price);
    }

    pub fn fetch_starts(&self) -> Vec<std::time::Duration> {
        self.fetch_starts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for SlowSource {
    async fn fetch_good(&self, good_id: &str) -> Result<GoodInfo> {
        self.fetch_starts.lock().unwrap().push(self.started.elapsed());
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_good(good_id).await
    }
}
