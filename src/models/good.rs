//! Tracked good model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A tracked product as stored in `good_info`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Good {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized record scraped from the vendor page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodInfo {
    pub good_id: String,
    pub name: String,
    pub price: i64,
}

impl GoodInfo {
    pub fn new(good_id: impl Into<String>, name: impl Into<String>, price: i64) -> Self {
        Self {
            good_id: good_id.into(),
            name: name.into(),
            price,
        }
    }
}
