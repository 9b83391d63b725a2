//! Mock Telegram API Server for testing
//!
//! Simulates the `sendMessage` method of the Bot API with wiremock.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "12345:test_token";

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    /// Bot that talks to this server instead of api.telegram.org
    pub fn bot(&self) -> Bot {
        let url = url::Url::parse(&self.server.uri()).expect("mock server uri");
        Bot::new(TEST_BOT_TOKEN).set_api_url(url)
    }

    /// Accept every `sendMessage` call
    pub async fn mock_send_message_success(&self) {
        Mock::given(method("POST"))
            .and(path_regex(send_message_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_response()))
            .mount(&self.server)
            .await;
    }

    /// Reject every `sendMessage` call like a chat that blocked the bot
    pub async fn mock_send_message_failure(&self) {
        Mock::given(method("POST"))
            .and(path_regex(send_message_path()))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every `sendMessage` request received so far
    pub async fn sent_messages(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path().to_lowercase().ends_with("/sendmessage"))
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}

fn send_message_path() -> String {
    format!("(?i)^/bot{}/sendmessage$", TEST_BOT_TOKEN)
}

fn message_response() -> Value {
    json!({
        "ok": true,
        "result": {
            "message_id": 123,
            "from": {
                "id": 12345,
                "is_bot": true,
                "first_name": "TestBot",
                "username": "test_bot"
            },
            "chat": {
                "id": 555,
                "first_name": "Test",
                "type": "private"
            },
            "date": 1640995200,
            "text": "Test message"
        }
    })
}
