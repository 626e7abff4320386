//! Outbound delivery channels (Telegram, email).
//!
//! A channel is an opaque send capability: one call per (channel, recipient)
//! pair. Channels never retry; the dispatcher captures failures per recipient.

mod email;
mod telegram;

pub use email::EmailChannel;
pub use telegram::TelegramChannel;

use crate::format::OutboundMessage;
use async_trait::async_trait;
use thiserror::Error;

/// A delivery failure for one recipient. Caught and logged by the dispatcher;
/// never escapes past it.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("send rejected: {0}")]
    Rejected(String),
    #[error("channel is not configured: {0}")]
    NotConfigured(&'static str),
}

/// Handle to an outbound channel (send one message to one recipient).
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Channel id for logs and reports (e.g. "telegram").
    fn name(&self) -> &'static str;

    /// Send one message to one recipient (Telegram chat id or email address).
    async fn send(&self, recipient: &str, message: &OutboundMessage) -> Result<(), ChannelError>;
}
