//! Command handler tests
//!
//! Handlers run against the in-memory store, replies go to a mock Bot API.

mod helpers;

use assert_matches::assert_matches;
use helpers::{TelegramMockServer, TestContext};
use price_tracker::handlers::commands::subscriptions::{handle_add, handle_remove};
use price_tracker::handlers::commands::Sender;
use price_tracker::PriceTrackerError;

const SENDER: Sender = Sender { user_id: 1, chat_id: 10 };

#[tokio::test]
async fn test_add_without_arguments_still_registers_user() {
    let ctx = TestContext::new();
    let mock = TelegramMockServer::new().await;

    let result = handle_add(&mock.bot(), SENDER, "", &ctx.services).await;
    assert_matches!(result, Err(PriceTrackerError::InvalidInput(_)));

    let user = ctx.store.user(1).unwrap();
    assert_eq!(user.chat_id, 10);
    assert!(mock.sent_messages().await.is_empty());
}

#[tokio::test]
async fn test_add_with_invalid_code_still_registers_user() {
    let ctx = TestContext::new();
    let mock = TelegramMockServer::new().await;

    let result = handle_add(&mock.bot(), SENDER, "abc-123 500", &ctx.services).await;
    assert_matches!(result, Err(PriceTrackerError::InvalidInput(_)));
    assert!(ctx.store.user(1).is_some());
    assert!(ctx.source.calls().is_empty());
}

#[tokio::test]
async fn test_remove_without_code_still_registers_user() {
    let ctx = TestContext::new();
    let mock = TelegramMockServer::new().await;

    let result = handle_remove(&mock.bot(), SENDER, "   ", &ctx.services).await;
    assert_matches!(result, Err(PriceTrackerError::InvalidInput(_)));
    assert!(ctx.store.user(1).is_some());
}

#[tokio::test]
async fn test_add_replies_with_tracked_good() {
    let ctx = TestContext::new();
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message_success().await;
    ctx.source.set_price("10154913", "Wireless Earbuds Pro", 1299);

    handle_add(&mock.bot(), SENDER, "10154913 1,200", &ctx.services).await.unwrap();

    let sent = mock.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["chat_id"], 10);
    assert_eq!(
        sent[0]["text"],
        "Tracking Wireless Earbuds Pro (10154913)\nCurrent price: 1,299\nAlert below: 1,200"
    );
    assert_eq!(ctx.store.subscriptions()[0].recorded_price, 1200);
}
