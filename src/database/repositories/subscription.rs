//! Subscription repository implementation

use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;
use crate::models::subscription::{Subscription, CreateSubscriptionRequest, SubscribedGood, PendingAlert};
use crate::utils::errors::PriceTrackerError;

const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, good_id, price AS recorded_price, is_notified, created_at, updated_at";

#[derive(Clone)]
#[derive(Debug)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Subscribe a user to a good at the requested price.
    ///
    /// The user row is locked while counting so concurrent adds cannot
    /// overshoot `limit`. An existing subscription to the same good counts
    /// towards the limit and is overwritten with `is_notified = false`.
    pub async fn add(&self, request: CreateSubscriptionRequest, limit: i64) -> Result<Subscription, PriceTrackerError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(r#"SELECT id FROM "user" WHERE id = $1 FOR UPDATE"#)
            .bind(request.user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let count: (i64,) = sqlx::query_as("SELECT COUNT(1) FROM user_sub_good WHERE user_id = $1")
            .bind(request.user_id)
            .fetch_one(&mut *tx)
            .await?;

        if count.0 >= limit {
            tx.rollback().await?;
            return Err(PriceTrackerError::ExceedLimit { limit });
        }

        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            r#"
            INSERT INTO user_sub_good (id, user_id, good_id, price, is_notified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, false, $5, $5)
            ON CONFLICT (user_id, good_id) DO UPDATE
            SET price = EXCLUDED.price,
                is_notified = EXCLUDED.is_notified,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            SUBSCRIPTION_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(request.user_id)
        .bind(&request.good_id)
        .bind(request.recorded_price)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(subscription)
    }

    /// Find a user's subscription to a good
    pub async fn find(&self, user_id: i64, good_id: &str) -> Result<Option<Subscription>, PriceTrackerError> {
        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {} FROM user_sub_good WHERE user_id = $1 AND good_id = $2",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(user_id)
        .bind(good_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    /// Remove one subscription, returns true when a row was deleted
    pub async fn remove(&self, user_id: i64, good_id: &str) -> Result<bool, PriceTrackerError> {
        let result = sqlx::query("DELETE FROM user_sub_good WHERE user_id = $1 AND good_id = $2")
            .bind(user_id)
            .bind(good_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all subscriptions of a user
    pub async fn clear(&self, user_id: i64) -> Result<u64, PriceTrackerError> {
        let result = sqlx::query("DELETE FROM user_sub_good WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// List a user's subscriptions joined with the good name and current price
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<SubscribedGood>, PriceTrackerError> {
        let goods = sqlx::query_as::<_, SubscribedGood>(
            r#"
            SELECT gi.id AS good_id, gi.name, gi.price AS current_price, usg.price AS recorded_price
            FROM user_sub_good usg
            JOIN good_info gi ON gi.id = usg.good_id
            WHERE usg.user_id = $1
            ORDER BY usg.created_at, gi.id
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(goods)
    }

    /// Count a user's subscriptions
    pub async fn count_for_user(&self, user_id: i64) -> Result<i64, PriceTrackerError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_sub_good WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Whether any subscription references the good
    pub async fn exists_for_good(&self, good_id: &str) -> Result<bool, PriceTrackerError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM user_sub_good WHERE good_id = $1)"
        )
        .bind(good_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Clear the notified flag on every subscription of a good
    pub async fn reset_notified(&self, good_id: &str) -> Result<u64, PriceTrackerError> {
        let result = sqlx::query(
            "UPDATE user_sub_good SET is_notified = false, updated_at = $2 WHERE good_id = $1"
        )
        .bind(good_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Subscriptions recorded above `price` that have not been alerted yet
    pub async fn find_pending_alerts(&self, good_id: &str, price: i64) -> Result<Vec<PendingAlert>, PriceTrackerError> {
        let alerts = sqlx::query_as::<_, PendingAlert>(
            r#"
            SELECT usg.id AS subscription_id, usg.user_id, u.chat_id, usg.price AS recorded_price
            FROM user_sub_good usg
            JOIN "user" u ON usg.user_id = u.id
            WHERE usg.good_id = $1
              AND usg.price > $2
              AND usg.is_notified = false
            ORDER BY usg.created_at
            "#
        )
        .bind(good_id)
        .bind(price)
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    /// Flag the given subscriptions as alerted
    pub async fn mark_notified(&self, ids: &[Uuid]) -> Result<u64, PriceTrackerError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "UPDATE user_sub_good SET is_notified = true, updated_at = $2 WHERE id = ANY($1)"
        )
        .bind(ids)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
