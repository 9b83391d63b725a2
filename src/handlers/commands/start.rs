//! Start command handler
//!
//! Registers the user and shows the welcome message

use teloxide::{Bot, prelude::*};
use tracing::info;
use crate::handlers::commands::Sender;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

pub const WELCOME_TEXT: &str = "Welcome! Send /add <product code> to track a product, \
    and I will message you when its price drops below the price you recorded.\n\
    Use /help to see every command.";

/// Handle /start command
pub async fn handle_start(bot: &Bot, sender: Sender, services: &ServiceFactory) -> Result<()> {
    let user = services
        .subscription_service
        .register_user(sender.user_id, sender.chat_id)
        .await?;

    info!(user_id = user.id, "User started bot");
    log_user_action(user.id, "start", None);

    bot.send_message(ChatId(sender.chat_id), WELCOME_TEXT).await?;
    Ok(())
}
