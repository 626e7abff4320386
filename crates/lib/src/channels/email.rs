//! Email channel: one SMTP session per outgoing message.

use crate::channels::{ChannelError, DeliveryChannel};
use crate::config::SmtpConfig;
use crate::format::OutboundMessage;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// Longer than the Telegram bound: every send pays STARTTLS and auth setup.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound SMTP connector. A fresh transport is built per send and dropped
/// when the send resolves, so each recipient gets its own session and no
/// connection state is shared across requests.
pub struct EmailChannel {
    host: String,
    port: u16,
    username: String,
    password: String,
    from: Mailbox,
}

impl EmailChannel {
    /// Build from config and a resolved password. Fails when the relay host
    /// or from address is missing or unparseable.
    pub fn new(config: &SmtpConfig, password: String) -> Result<Self, ChannelError> {
        if config.host.trim().is_empty() {
            return Err(ChannelError::NotConfigured("smtp host is empty"));
        }
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|_| ChannelError::NotConfigured("smtp from address is invalid"))?;
        Ok(Self {
            host: config.host.trim().to_string(),
            port: config.port,
            username: config.username.clone(),
            password,
            from,
        })
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, ChannelError> {
        let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| ChannelError::Transport(e.to_string()))?;
        Ok(builder
            .port(self.port)
            .credentials(Credentials::new(self.username.clone(), self.password.clone()))
            .timeout(Some(SEND_TIMEOUT))
            .build())
    }
}

#[async_trait]
impl DeliveryChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, recipient: &str, message: &OutboundMessage) -> Result<(), ChannelError> {
        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| ChannelError::Rejected(format!("invalid recipient address: {}", e)))?;
        let mail = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| ChannelError::Rejected(format!("building message: {}", e)))?;
        // Transport is dropped at the end of this call; the session is torn
        // down on success and failure alike.
        let transport = self.transport()?;
        transport
            .send(mail)
            .await
            .map(|_| ())
            .map_err(|e| ChannelError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_host() {
        let config = SmtpConfig::default();
        assert!(matches!(
            EmailChannel::new(&config, String::new()),
            Err(ChannelError::NotConfigured(_))
        ));
    }

    #[test]
    fn rejects_bad_from_address() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            from: "not an address".to_string(),
            ..SmtpConfig::default()
        };
        assert!(matches!(
            EmailChannel::new(&config, "pw".to_string()),
            Err(ChannelError::NotConfigured(_))
        ));
    }

    #[test]
    fn builds_with_valid_config() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            username: "leadgate".to_string(),
            from: "Leadgate <noreply@example.com>".to_string(),
            ..SmtpConfig::default()
        };
        assert!(EmailChannel::new(&config, "pw".to_string()).is_ok());
    }
}
