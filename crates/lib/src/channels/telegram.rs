//! Telegram channel: sendMessage via Bot API.

use crate::channels::{ChannelError, DeliveryChannel};
use crate::config::TelegramConfig;
use crate::format::OutboundMessage;
use async_trait::async_trait;
use std::time::Duration;

/// Per-send bound; Telegram answers well within this or not at all.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound Telegram connector. Recipients are chat ids; every recipient of a
/// lead gets the same rendered message (the Bot API has no batch send).
pub struct TelegramChannel {
    token: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    /// Build from config and a resolved token. `api_base` is configurable so
    /// tests can point the channel at a stub server.
    pub fn new(config: &TelegramConfig, token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            token,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Send a text message to a chat via the sendMessage API.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ChannelError::Rejected(format!(
                "sendMessage failed: {} {}",
                status, body
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DeliveryChannel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, recipient: &str, message: &OutboundMessage) -> Result<(), ChannelError> {
        self.send_message(recipient, &message.body).await
    }
}
