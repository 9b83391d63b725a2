//! Subscription service implementation
//!
//! This service backs the bot commands: it registers users, scrapes and
//! stores the good being tracked, and manages the user's subscriptions.

use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::config::SubscriptionConfig;
use crate::database::PriceStore;
use crate::models::{Good, GoodInfo, User, CreateSubscriptionRequest, SubscribedGood};
use crate::services::scraper::PriceSource;
use crate::utils::errors::{PriceTrackerError, Result};
use crate::utils::helpers::is_valid_good_code;

/// Result of tracking a good
#[derive(Debug, Clone)]
pub struct TrackedGood {
    pub good: Good,
    pub recorded_price: i64,
}

/// The subscription insert hit a good that no longer exists
fn is_missing_good(error: &PriceTrackerError) -> bool {
    match error {
        PriceTrackerError::GoodNotFound { .. } => true,
        PriceTrackerError::Database(sqlx::Error::Database(db)) => db.is_foreign_key_violation(),
        _ => false,
    }
}

#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn PriceStore>,
    source: Arc<dyn PriceSource>,
    config: SubscriptionConfig,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn PriceStore>, source: Arc<dyn PriceSource>, config: SubscriptionConfig) -> Self {
        Self { store, source, config }
    }

    pub fn limit(&self) -> i64 {
        self.config.max_per_user
    }

    /// Register the user on first interaction, refresh the chat id otherwise
    pub async fn register_user(&self, user_id: i64, chat_id: i64) -> Result<User> {
        debug!(user_id = user_id, chat_id = chat_id, "Upserting user");
        self.store.upsert_user(user_id, chat_id).await
    }

    /// Start tracking a good for a user.
    ///
    /// Without an explicit price the current price becomes the threshold,
    /// so any later drop triggers an alert.
    pub async fn track(&self, user_id: i64, chat_id: i64, good_code: &str, price: Option<i64>) -> Result<TrackedGood> {
        self.register_user(user_id, chat_id).await?;

        if !is_valid_good_code(good_code) {
            return Err(PriceTrackerError::InvalidInput(format!("Invalid product code: {}", good_code)));
        }
        if let Some(price) = price {
            if price <= 0 {
                return Err(PriceTrackerError::InvalidInput(format!("Price must be positive: {}", price)));
            }
        }

        let info = self.source.fetch_good(good_code).await?;
        let good = self.store_good(&info).await?;
        let recorded_price = price.unwrap_or(good.price);

        let request = CreateSubscriptionRequest {
            user_id,
            good_id: good.id.clone(),
            recorded_price,
        };

        let added = match self.store.add_subscription(request.clone(), self.config.max_per_user).await {
            Err(e) if is_missing_good(&e) => {
                // A sync pass removed the good between the upsert and the insert
                debug!(good_id = %good.id, "Good removed concurrently, storing it again");
                self.store.upsert_good(&info).await?;
                self.store.add_subscription(request, self.config.max_per_user).await
            }
            other => other,
        };

        match added {
            Ok(subscription) => {
                info!(
                    user_id = user_id,
                    good_id = %good.id,
                    recorded_price = subscription.recorded_price,
                    "Subscription saved"
                );
                Ok(TrackedGood { good, recorded_price: subscription.recorded_price })
            }
            Err(e @ PriceTrackerError::ExceedLimit { .. }) => {
                warn!(user_id = user_id, good_id = %good.id, "Subscription limit reached");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Store freshly scraped data, resetting alerts when the price moved
    /// since the last time it was stored
    async fn store_good(&self, info: &GoodInfo) -> Result<Good> {
        let previous = self.store.find_good(&info.good_id).await?;
        let good = self.store.upsert_good(info).await?;

        if let Some(previous) = previous {
            if previous.price != good.price {
                let reset = self.store.reset_notified(&good.id).await?;
                info!(
                    good_id = %good.id,
                    old_price = previous.price,
                    new_price = good.price,
                    reset = reset,
                    "Price changed"
                );
            }
        }

        Ok(good)
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<SubscribedGood>> {
        self.store.list_subscriptions(user_id).await
    }

    /// Stop tracking one good, true when a subscription was removed
    pub async fn remove(&self, user_id: i64, good_code: &str) -> Result<bool> {
        let removed = self.store.remove_subscription(user_id, good_code).await?;
        info!(user_id = user_id, good_id = good_code, removed = removed, "Subscription removal");
        Ok(removed)
    }

    /// Remove every subscription of the user
    pub async fn clear(&self, user_id: i64) -> Result<u64> {
        let removed = self.store.clear_subscriptions(user_id).await?;
        info!(user_id = user_id, removed = removed, "Subscriptions cleared");
        Ok(removed)
    }
}
