//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /add, etc.

pub mod start;
pub mod help;
pub mod subscriptions;

use teloxide::{Bot, types::Message, prelude::*, utils::command::BotCommands};
use tracing::{debug, error};
use crate::services::ServiceFactory;
use crate::utils::errors::{PriceTrackerError, Result};
use crate::utils::helpers::format_price;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Price tracker commands:")]
pub enum Command {
    #[command(description = "Start the bot and show welcome message")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Track a product: /add <code> [price]")]
    Add(String),
    #[command(description = "List tracked products")]
    List,
    #[command(description = "Stop tracking a product: /remove <code>")]
    Remove(String),
    #[command(description = "Stop tracking every product")]
    Clear,
}

/// Telegram identity of the sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sender {
    pub user_id: i64,
    pub chat_id: i64,
}

impl Sender {
    pub fn from_message(msg: &Message) -> Result<Self> {
        let user = msg
            .from
            .as_ref()
            .ok_or_else(|| PriceTrackerError::InvalidInput("No user in message".to_string()))?;

        Ok(Self {
            user_id: user.id.0 as i64,
            chat_id: msg.chat.id.0,
        })
    }
}

/// Main command dispatcher
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command, services: ServiceFactory) -> Result<()> {
    let sender = Sender::from_message(&msg)?;
    debug!(user_id = sender.user_id, chat_id = sender.chat_id, command = ?cmd, "Processing command");

    let result = match cmd {
        Command::Start => start::handle_start(&bot, sender, &services).await,
        Command::Help => help::handle_help(&bot, sender, &services).await,
        Command::Add(args) => subscriptions::handle_add(&bot, sender, &args, &services).await,
        Command::List => subscriptions::handle_list(&bot, sender, &services).await,
        Command::Remove(code) => subscriptions::handle_remove(&bot, sender, &code, &services).await,
        Command::Clear => subscriptions::handle_clear(&bot, sender, &services).await,
    };

    if let Err(e) = result {
        error!(user_id = sender.user_id, error = %e, "Error handling command");
        bot.send_message(ChatId(sender.chat_id), error_reply(&e)).await?;
    }

    Ok(())
}

/// Short user-facing text for a failed command
pub fn error_reply(error: &PriceTrackerError) -> String {
    match error {
        PriceTrackerError::ExceedLimit { limit } => format!(
            "You can track at most {} products. Remove one with /remove first.",
            format_price(*limit)
        ),
        PriceTrackerError::InvalidInput(message) => message.clone(),
        PriceTrackerError::Scrape(_) | PriceTrackerError::Http(_) => {
            "Could not read that product page. Check the code and try again.".to_string()
        }
        PriceTrackerError::GoodNotFound { good_id } => format!("Product {} is not tracked.", good_id),
        _ => "Something went wrong, please try again later.".to_string(),
    }
}
