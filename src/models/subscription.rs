//! Subscription model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A user's price-drop watch on a good, stored in `user_sub_good`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: i64,
    pub good_id: String,
    /// Alert once the good is cheaper than this
    pub recorded_price: i64,
    pub is_notified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub user_id: i64,
    pub good_id: String,
    pub recorded_price: i64,
}

/// Row returned when listing a user's subscriptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SubscribedGood {
    pub good_id: String,
    pub name: String,
    pub current_price: i64,
    pub recorded_price: i64,
}

/// A subscription that is due a price drop alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PendingAlert {
    pub subscription_id: Uuid,
    pub user_id: i64,
    pub chat_id: i64,
    pub recorded_price: i64,
}
