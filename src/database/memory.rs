//! In-memory store
//!
//! Mirrors the PostgreSQL schema with plain collections behind one lock.
//! Used by the test suite and for dry runs without a database.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;
use crate::database::PriceStore;
use crate::models::*;
use crate::utils::errors::{PriceTrackerError, Result};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<i64, User>,
    goods: BTreeMap<String, Good>,
    // Insertion order stands in for `created_at` ordering
    subscriptions: Vec<Subscription>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn user(&self, user_id: i64) -> Option<User> {
        self.read().users.get(&user_id).cloned()
    }

    /// Snapshot of every subscription, in insertion order
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.read().subscriptions.clone()
    }
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn upsert_user(&self, user_id: i64, chat_id: i64) -> Result<User> {
        let now = Utc::now();
        let mut tables = self.write();
        let user = tables.users.entry(user_id).or_insert_with(|| User {
            id: user_id,
            chat_id,
            created_at: now,
            updated_at: now,
        });
        user.chat_id = chat_id;
        user.updated_at = now;
        Ok(user.clone())
    }

    async fn all_goods(&self) -> Result<Vec<Good>> {
        Ok(self.read().goods.values().cloned().collect())
    }

    async fn find_good(&self, good_id: &str) -> Result<Option<Good>> {
        Ok(self.read().goods.get(good_id).cloned())
    }

    async fn upsert_good(&self, info: &GoodInfo) -> Result<Good> {
        let now = Utc::now();
        let mut tables = self.write();
        let good = tables.goods.entry(info.good_id.clone()).or_insert_with(|| Good {
            id: info.good_id.clone(),
            name: info.name.clone(),
            price: info.price,
            created_at: now,
            updated_at: now,
        });
        good.name = info.name.clone();
        good.price = info.price;
        good.updated_at = now;
        Ok(good.clone())
    }

    async fn delete_good_if_unreferenced(&self, good_id: &str) -> Result<bool> {
        let mut tables = self.write();
        if tables.subscriptions.iter().any(|s| s.good_id == good_id) {
            return Ok(false);
        }
        Ok(tables.goods.remove(good_id).is_some())
    }

    async fn add_subscription(&self, request: CreateSubscriptionRequest, limit: i64) -> Result<Subscription> {
        let now = Utc::now();
        let mut tables = self.write();

        let count = tables.subscriptions.iter().filter(|s| s.user_id == request.user_id).count() as i64;
        if count >= limit {
            return Err(PriceTrackerError::ExceedLimit { limit });
        }
        if !tables.users.contains_key(&request.user_id) {
            return Err(PriceTrackerError::InvalidInput(format!("Unknown user: {}", request.user_id)));
        }
        if !tables.goods.contains_key(&request.good_id) {
            return Err(PriceTrackerError::GoodNotFound { good_id: request.good_id });
        }

        if let Some(existing) = tables
            .subscriptions
            .iter_mut()
            .find(|s| s.user_id == request.user_id && s.good_id == request.good_id)
        {
            existing.recorded_price = request.recorded_price;
            existing.is_notified = false;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let subscription = Subscription {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            good_id: request.good_id,
            recorded_price: request.recorded_price,
            is_notified: false,
            created_at: now,
            updated_at: now,
        };
        tables.subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn find_subscription(&self, user_id: i64, good_id: &str) -> Result<Option<Subscription>> {
        Ok(self
            .read()
            .subscriptions
            .iter()
            .find(|s| s.user_id == user_id && s.good_id == good_id)
            .cloned())
    }

    async fn remove_subscription(&self, user_id: i64, good_id: &str) -> Result<bool> {
        let mut tables = self.write();
        let before = tables.subscriptions.len();
        tables.subscriptions.retain(|s| !(s.user_id == user_id && s.good_id == good_id));
        Ok(tables.subscriptions.len() < before)
    }

    async fn clear_subscriptions(&self, user_id: i64) -> Result<u64> {
        let mut tables = self.write();
        let before = tables.subscriptions.len();
        tables.subscriptions.retain(|s| s.user_id != user_id);
        Ok((before - tables.subscriptions.len()) as u64)
    }

    async fn list_subscriptions(&self, user_id: i64) -> Result<Vec<SubscribedGood>> {
        let tables = self.read();
        Ok(tables
            .subscriptions
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| {
                tables.goods.get(&s.good_id).map(|good| SubscribedGood {
                    good_id: good.id.clone(),
                    name: good.name.clone(),
                    current_price: good.price,
                    recorded_price: s.recorded_price,
                })
            })
            .collect())
    }

    async fn count_subscriptions(&self, user_id: i64) -> Result<i64> {
        Ok(self.read().subscriptions.iter().filter(|s| s.user_id == user_id).count() as i64)
    }

    async fn has_subscriptions(&self, good_id: &str) -> Result<bool> {
        Ok(self.read().subscriptions.iter().any(|s| s.good_id == good_id))
    }

    async fn reset_notified(&self, good_id: &str) -> Result<u64> {
        let now = Utc::now();
        let mut tables = self.write();
        let mut updated = 0;
        for subscription in tables.subscriptions.iter_mut().filter(|s| s.good_id == good_id) {
            subscription.is_notified = false;
            subscription.updated_at = now;
            updated += 1;
        }
        Ok(updated)
    }

    async fn find_pending_alerts(&self, good_id: &str, price: i64) -> Result<Vec<PendingAlert>> {
        let tables = self.read();
        Ok(tables
            .subscriptions
            .iter()
            .filter(|s| s.good_id == good_id && s.recorded_price > price && !s.is_notified)
            .filter_map(|s| {
                tables.users.get(&s.user_id).map(|user| PendingAlert {
                    subscription_id: s.id,
                    user_id: s.user_id,
                    chat_id: user.chat_id,
                    recorded_price: s.recorded_price,
                })
            })
            .collect())
    }

    async fn mark_notified(&self, subscription_ids: &[Uuid]) -> Result<u64> {
        if subscription_ids.is_empty() {
            return Ok(0);
        }
        let now = Utc::now();
        let mut tables = self.write();
        let mut updated = 0;
        for subscription in tables.subscriptions.iter_mut().filter(|s| subscription_ids.contains(&s.id)) {
            subscription.is_notified = true;
            subscription.updated_at = now;
            updated += 1;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.upsert_user(1, 100).await.unwrap();
        store.upsert_user(2, 200).await.unwrap();
        for code in ["A1", "B2", "C3"] {
            store.upsert_good(&GoodInfo::new(code, format!("Good {}", code), 1000)).await.unwrap();
        }
        store
    }

    fn request(user_id: i64, good_id: &str, price: i64) -> CreateSubscriptionRequest {
        CreateSubscriptionRequest {
            user_id,
            good_id: good_id.to_string(),
            recorded_price: price,
        }
    }

    #[tokio::test]
    async fn test_add_rejects_over_limit() {
        let store = seeded_store().await;
        store.add_subscription(request(1, "A1", 900), 2).await.unwrap();
        store.add_subscription(request(1, "B2", 900), 2).await.unwrap();

        let result = store.add_subscription(request(1, "C3", 900), 2).await;
        assert_matches!(result, Err(PriceTrackerError::ExceedLimit { limit: 2 }));
        assert_eq!(store.count_subscriptions(1).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_readd_updates_price_and_resets_flag() {
        let store = seeded_store().await;
        let first = store.add_subscription(request(1, "A1", 900), 5).await.unwrap();
        store.mark_notified(&[first.id]).await.unwrap();

        let second = store.add_subscription(request(1, "A1", 800), 5).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.recorded_price, 800);
        assert!(!second.is_notified);
        assert_eq!(store.count_subscriptions(1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_only_touches_one_user() {
        let store = seeded_store().await;
        store.add_subscription(request(1, "A1", 900), 5).await.unwrap();
        store.add_subscription(request(1, "B2", 900), 5).await.unwrap();
        store.add_subscription(request(2, "A1", 900), 5).await.unwrap();

        assert_eq!(store.clear_subscriptions(1).await.unwrap(), 2);
        assert_eq!(store.count_subscriptions(1).await.unwrap(), 0);
        assert_eq!(store.count_subscriptions(2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_good_keeps_referenced_rows() {
        let store = seeded_store().await;
        store.add_subscription(request(1, "A1", 900), 5).await.unwrap();

        assert!(!store.delete_good_if_unreferenced("A1").await.unwrap());
        assert!(store.delete_good_if_unreferenced("B2").await.unwrap());
        assert!(store.find_good("A1").await.unwrap().is_some());
        assert!(store.find_good("B2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pending_alerts_use_latest_chat_id() {
        let store = seeded_store().await;
        store.add_subscription(request(1, "A1", 900), 5).await.unwrap();
        store.upsert_user(1, 101).await.unwrap();

        let alerts = store.find_pending_alerts("A1", 850).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].chat_id, 101);
        assert!(store.find_pending_alerts("A1", 900).await.unwrap().is_empty());
    }
}
