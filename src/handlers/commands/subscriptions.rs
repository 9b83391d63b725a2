//! Subscription command handlers
//!
//! Handles /add, /list, /remove and /clear

use teloxide::{Bot, prelude::*};
use crate::handlers::commands::Sender;
use crate::models::SubscribedGood;
use crate::services::{ServiceFactory, TrackedGood};
use crate::utils::errors::{PriceTrackerError, Result};
use crate::utils::helpers::{format_price, truncate_text};
use crate::utils::logging::log_user_action;

const MAX_NAME_LENGTH: usize = 60;

/// Split `/add` arguments into a product code and an optional price
pub fn parse_add_args(args: &str) -> Result<(String, Option<i64>)> {
    let mut parts = args.split_whitespace();
    let code = parts
        .next()
        .ok_or_else(|| PriceTrackerError::InvalidInput("Usage: /add <product code> [price]".to_string()))?;

    let price = match parts.next() {
        Some(raw) => Some(
            raw.replace(',', "")
                .parse::<i64>()
                .map_err(|_| PriceTrackerError::InvalidInput(format!("Invalid price: {}", raw)))?,
        ),
        None => None,
    };

    if parts.next().is_some() {
        return Err(PriceTrackerError::InvalidInput("Usage: /add <product code> [price]".to_string()));
    }

    Ok((code.to_string(), price))
}

pub fn format_tracked(tracked: &TrackedGood) -> String {
    format!(
        "Tracking {} ({})\nCurrent price: {}\nAlert below: {}",
        truncate_text(&tracked.good.name, MAX_NAME_LENGTH),
        tracked.good.id,
        format_price(tracked.good.price),
        format_price(tracked.recorded_price)
    )
}

pub fn format_subscription_list(goods: &[SubscribedGood]) -> String {
    if goods.is_empty() {
        return "You are not tracking any products. Use /add <product code> to start.".to_string();
    }

    let lines: Vec<String> = goods
        .iter()
        .enumerate()
        .map(|(i, good)| {
            format!(
                "{}. {} ({})\n   now {}, alert below {}",
                i + 1,
                truncate_text(&good.name, MAX_NAME_LENGTH),
                good.good_id,
                format_price(good.current_price),
                format_price(good.recorded_price)
            )
        })
        .collect();

    format!("Tracked products:\n{}", lines.join("\n"))
}

/// Handle /add command
pub async fn handle_add(bot: &Bot, sender: Sender, args: &str, services: &ServiceFactory) -> Result<()> {
    let service = &services.subscription_service;
    service.register_user(sender.user_id, sender.chat_id).await?;

    let (code, price) = parse_add_args(args)?;
    let tracked = service
        .track(sender.user_id, sender.chat_id, &code, price)
        .await?;

    log_user_action(sender.user_id, "add", Some(&code));
    bot.send_message(ChatId(sender.chat_id), format_tracked(&tracked)).await?;
    Ok(())
}

/// Handle /list command
pub async fn handle_list(bot: &Bot, sender: Sender, services: &ServiceFactory) -> Result<()> {
    let service = &services.subscription_service;
    service.register_user(sender.user_id, sender.chat_id).await?;
    let goods = service.list(sender.user_id).await?;

    bot.send_message(ChatId(sender.chat_id), format_subscription_list(&goods)).await?;
    Ok(())
}

/// Handle /remove command
pub async fn handle_remove(bot: &Bot, sender: Sender, code: &str, services: &ServiceFactory) -> Result<()> {
    let service = &services.subscription_service;
    service.register_user(sender.user_id, sender.chat_id).await?;

    let code = code.trim();
    if code.is_empty() {
        return Err(PriceTrackerError::InvalidInput("Usage: /remove <product code>".to_string()));
    }

    let text = if service.remove(sender.user_id, code).await? {
        log_user_action(sender.user_id, "remove", Some(code));
        format!("Stopped tracking {}.", code)
    } else {
        format!("You are not tracking {}.", code)
    };

    bot.send_message(ChatId(sender.chat_id), text).await?;
    Ok(())
}

/// Handle /clear command
pub async fn handle_clear(bot: &Bot, sender: Sender, services: &ServiceFactory) -> Result<()> {
    let service = &services.subscription_service;
    service.register_user(sender.user_id, sender.chat_id).await?;
    let removed = service.clear(sender.user_id).await?;

    log_user_action(sender.user_id, "clear", None);
    bot.send_message(ChatId(sender.chat_id), format!("Removed {} tracked products.", removed)).await?;
    Ok(())
}
