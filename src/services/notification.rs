//! Notification service implementation
//!
//! Formats price drop alerts and delivers them to a user's chat through
//! teloxide.

use async_trait::async_trait;
use teloxide::{Bot, types::ChatId, requests::Requester};
use tracing::{debug, error};
use crate::utils::errors::{PriceTrackerError, Result};
use crate::utils::helpers::format_price;

/// Delivery channel for plain-text messages
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Build the alert text for a good that got cheaper than the recorded price
pub fn format_price_drop_message(name: &str, new_price: i64, recorded_price: i64) -> String {
    format!(
        "{}\nCurrent price is {}, below your recorded price {}",
        name,
        format_price(new_price),
        format_price(recorded_price)
    )
}

/// Sends messages through the Telegram Bot API
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        match self.bot.send_message(ChatId(chat_id), text).await {
            Ok(message) => {
                debug!(chat_id = chat_id, message_id = message.id.0, "Message sent");
                Ok(())
            }
            Err(e) => {
                error!(chat_id = chat_id, error = %e, "Failed to send message");
                Err(PriceTrackerError::Telegram(e))
            }
        }
    }
}
