//! Help command handler

use teloxide::{Bot, prelude::*, utils::command::BotCommands};
use crate::handlers::commands::{Command, Sender};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

pub fn help_text(limit: i64) -> String {
    format!(
        "{}\n\nYou can track up to {} products.",
        Command::descriptions(),
        limit
    )
}

/// Handle /help command
pub async fn handle_help(bot: &Bot, sender: Sender, services: &ServiceFactory) -> Result<()> {
    services
        .subscription_service
        .register_user(sender.user_id, sender.chat_id)
        .await?;

    let text = help_text(services.subscription_service.limit());
    bot.send_message(ChatId(sender.chat_id), text).await?;
    Ok(())
}
