//! Good info repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::good::{Good, GoodInfo};
use crate::utils::errors::PriceTrackerError;

#[derive(Clone)]
#[derive(Debug)]
pub struct GoodRepository {
    pool: PgPool,
}

impl GoodRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the good or overwrite its name and price
    pub async fn upsert(&self, info: &GoodInfo) -> Result<Good, PriceTrackerError> {
        let good = sqlx::query_as::<_, Good>(
            r#"
            INSERT INTO good_info (id, name, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                price = EXCLUDED.price,
                updated_at = EXCLUDED.updated_at
            RETURNING id, name, price, created_at, updated_at
            "#
        )
        .bind(&info.good_id)
        .bind(&info.name)
        .bind(info.price)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(good)
    }

    /// Find good by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Good>, PriceTrackerError> {
        let good = sqlx::query_as::<_, Good>(
            "SELECT id, name, price, created_at, updated_at FROM good_info WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(good)
    }

    /// List every tracked good
    pub async fn list_all(&self) -> Result<Vec<Good>, PriceTrackerError> {
        let goods = sqlx::query_as::<_, Good>(
            "SELECT id, name, price, created_at, updated_at FROM good_info ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(goods)
    }

    /// Delete the good unless a subscription still references it.
    /// Returns true when the row was deleted.
    pub async fn delete_if_unreferenced(&self, id: &str) -> Result<bool, PriceTrackerError> {
        let result = sqlx::query(
            r#"
            DELETE FROM good_info
            WHERE id = $1
              AND NOT EXISTS (SELECT 1 FROM user_sub_good WHERE good_id = $1)
            "#
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
