//! Database service layer
//!
//! This module provides a high-level interface to database operations

use async_trait::async_trait;
use uuid::Uuid;
use crate::database::{DatabasePool, UserRepository, GoodRepository, SubscriptionRepository, PriceStore};
use crate::models::*;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub goods: GoodRepository,
    pub subscriptions: SubscriptionRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            goods: GoodRepository::new(pool.clone()),
            subscriptions: SubscriptionRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

#[async_trait]
impl PriceStore for DatabaseService {
    async fn upsert_user(&self, user_id: i64, chat_id: i64) -> Result<User> {
        self.users.upsert(user_id, chat_id).await
    }

    async fn all_goods(&self) -> Result<Vec<Good>> {
        self.goods.list_all().await
    }

    async fn find_good(&self, good_id: &str) -> Result<Option<Good>> {
        self.goods.find_by_id(good_id).await
    }

    async fn upsert_good(&self, info: &GoodInfo) -> Result<Good> {
        self.goods.upsert(info).await
    }

    async fn delete_good_if_unreferenced(&self, good_id: &str) -> Result<bool> {
        self.goods.delete_if_unreferenced(good_id).await
    }

    async fn add_subscription(&self, request: CreateSubscriptionRequest, limit: i64) -> Result<Subscription> {
        self.subscriptions.add(request, limit).await
    }

    async fn find_subscription(&self, user_id: i64, good_id: &str) -> Result<Option<Subscription>> {
        self.subscriptions.find(user_id, good_id).await
    }

    async fn remove_subscription(&self, user_id: i64, good_id: &str) -> Result<bool> {
        self.subscriptions.remove(user_id, good_id).await
    }

    async fn clear_subscriptions(&self, user_id: i64) -> Result<u64> {
        self.subscriptions.clear(user_id).await
    }

    async fn list_subscriptions(&self, user_id: i64) -> Result<Vec<SubscribedGood>> {
        self.subscriptions.list_for_user(user_id).await
    }

    async fn count_subscriptions(&self, user_id: i64) -> Result<i64> {
        self.subscriptions.count_for_user(user_id).await
    }

    async fn has_subscriptions(&self, good_id: &str) -> Result<bool> {
        self.subscriptions.exists_for_good(good_id).await
    }

    async fn reset_notified(&self, good_id: &str) -> Result<u64> {
        self.subscriptions.reset_notified(good_id).await
    }

    async fn find_pending_alerts(&self, good_id: &str, price: i64) -> Result<Vec<PendingAlert>> {
        self.subscriptions.find_pending_alerts(good_id, price).await
    }

    async fn mark_notified(&self, subscription_ids: &[Uuid]) -> Result<u64> {
        self.subscriptions.mark_notified(subscription_ids).await
    }
}

