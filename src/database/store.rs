//! Storage seam shared by the subscription and sync services

use async_trait::async_trait;
use uuid::Uuid;
use crate::models::{User, Good, GoodInfo, Subscription, CreateSubscriptionRequest, SubscribedGood, PendingAlert};
use crate::utils::errors::Result;

/// Every store operation the services need.
///
/// Each call is independent: it acquires its own connection and commits
/// before returning. No transaction spans several calls.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Create the user or overwrite its chat id
    async fn upsert_user(&self, user_id: i64, chat_id: i64) -> Result<User>;

    async fn all_goods(&self) -> Result<Vec<Good>>;
    async fn find_good(&self, good_id: &str) -> Result<Option<Good>>;
    async fn upsert_good(&self, info: &GoodInfo) -> Result<Good>;
    /// Delete the good when no subscription references it, true if deleted
    async fn delete_good_if_unreferenced(&self, good_id: &str) -> Result<bool>;

    /// Fails with `ExceedLimit` once the user holds `limit` subscriptions
    async fn add_subscription(&self, request: CreateSubscriptionRequest, limit: i64) -> Result<Subscription>;
    async fn find_subscription(&self, user_id: i64, good_id: &str) -> Result<Option<Subscription>>;
    async fn remove_subscription(&self, user_id: i64, good_id: &str) -> Result<bool>;
    async fn clear_subscriptions(&self, user_id: i64) -> Result<u64>;
    async fn list_subscriptions(&self, user_id: i64) -> Result<Vec<SubscribedGood>>;
    async fn count_subscriptions(&self, user_id: i64) -> Result<i64>;
    async fn has_subscriptions(&self, good_id: &str) -> Result<bool>;

    async fn reset_notified(&self, good_id: &str) -> Result<u64>;
    /// Un-notified subscriptions whose recorded price is above `price`
    async fn find_pending_alerts(&self, good_id: &str, price: i64) -> Result<Vec<PendingAlert>>;
    async fn mark_notified(&self, subscription_ids: &[Uuid]) -> Result<u64>;
}
