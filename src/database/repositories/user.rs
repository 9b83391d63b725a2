//! User repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::user::User;
use crate::utils::errors::PriceTrackerError;

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the user or refresh its chat id
    pub async fn upsert(&self, id: i64, chat_id: i64) -> Result<User, PriceTrackerError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO "user" (id, chat_id, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (id) DO UPDATE
            SET chat_id = EXCLUDED.chat_id,
                updated_at = EXCLUDED.updated_at
            RETURNING id, chat_id, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(chat_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
