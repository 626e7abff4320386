//! Concurrent fan-out delivery of accepted leads.
//!
//! The two channels run concurrently relative to each other and every
//! recipient send within a channel runs concurrently too. Each send is
//! bounded by a per-channel timeout and its failure is captured in the
//! report for that recipient only — siblings are never cancelled and no
//! send error escapes the dispatcher. All sends are joined before the HTTP
//! response is produced.

use crate::channels::DeliveryChannel;
use crate::config::{resolve_recipients, Config};
use crate::format::{render, Markup, OutboundMessage, Style};
use crate::lead::LeadSubmission;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;

const TELEGRAM_SEND_TIMEOUT: Duration = Duration::from_secs(10);
const EMAIL_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// The configured outbound channels. `None` means the transport is not set up
/// (e.g. no bot token); leads requesting that channel are reported failed.
#[derive(Clone, Default)]
pub struct ChannelSet {
    pub telegram: Option<Arc<dyn DeliveryChannel>>,
    pub email: Option<Arc<dyn DeliveryChannel>>,
}

/// Outcome of one send attempt to one recipient.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub recipient: String,
    /// `None` on success, otherwise the captured error text.
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-channel aggregation of send attempts.
#[derive(Debug, Clone)]
pub struct ChannelReport {
    pub channel: &'static str,
    /// False when the lead requested this channel but no transport is configured.
    pub configured: bool,
    pub attempts: Vec<DeliveryOutcome>,
}

impl ChannelReport {
    /// A channel is ok when its transport exists and either nothing had to be
    /// sent (no recipients configured) or at least one recipient succeeded.
    pub fn ok(&self) -> bool {
        self.configured && (self.attempts.is_empty() || self.attempts.iter().any(|o| o.success()))
    }
}

/// Delivery result for one accepted lead. `None` per channel means the lead
/// did not request it. Consumed for logging only; the HTTP response does not
/// change with delivery outcomes.
#[derive(Debug, Clone, Default)]
pub struct DeliveryReport {
    pub telegram: Option<ChannelReport>,
    pub email: Option<ChannelReport>,
}

/// Send one message to every recipient concurrently, capturing per-recipient
/// failures. The timeout bounds each individual send.
async fn deliver_channel(
    channel: &dyn DeliveryChannel,
    recipients: Vec<String>,
    message: &OutboundMessage,
    timeout: Duration,
    lead_id: &str,
) -> Vec<DeliveryOutcome> {
    let sends = recipients.into_iter().map(|recipient| async move {
        let result = tokio::time::timeout(timeout, channel.send(&recipient, message)).await;
        let error = match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(_) => Some(format!("send timed out after {:?}", timeout)),
        };
        match &error {
            None => log::debug!(
                "lead #{}: {} send to {} ok",
                lead_id,
                channel.name(),
                recipient
            ),
            Some(e) => log::warn!(
                "lead #{}: {} send to {} failed: {}",
                lead_id,
                channel.name(),
                recipient,
                e
            ),
        }
        DeliveryOutcome { recipient, error }
    });
    join_all(sends).await
}

async fn run_channel(
    name: &'static str,
    channel: Option<&Arc<dyn DeliveryChannel>>,
    recipients: Vec<String>,
    message: OutboundMessage,
    timeout: Duration,
    lead_id: &str,
) -> ChannelReport {
    let Some(channel) = channel else {
        log::warn!(
            "lead #{}: {} delivery requested but the channel is not configured",
            lead_id,
            name
        );
        return ChannelReport {
            channel: name,
            configured: false,
            attempts: Vec::new(),
        };
    };
    log::debug!(
        "lead #{}: sending via {} to {} recipient(s)",
        lead_id,
        name,
        recipients.len()
    );
    let attempts = deliver_channel(channel.as_ref(), recipients, &message, timeout, lead_id).await;
    ChannelReport {
        channel: name,
        configured: true,
        attempts,
    }
}

/// Deliver an accepted lead to every channel it requested. Returns once every
/// attempted send has completed or timed out.
pub async fn dispatch(
    lead: &LeadSubmission,
    config: &Config,
    channels: &ChannelSet,
) -> DeliveryReport {
    let style = Style::for_lead(lead);
    let entry = config.sources.get(&lead.source);
    let empty: Vec<String> = Vec::new();

    let telegram = async {
        if !lead.is_telegram {
            return None;
        }
        let recipients = resolve_recipients(
            entry.map(|e| e.telegram_chats.as_slice()).unwrap_or(&empty),
            &config.defaults.telegram_chats,
        );
        let message = render(lead, style, Markup::Html);
        Some(
            run_channel(
                "telegram",
                channels.telegram.as_ref(),
                recipients,
                message,
                TELEGRAM_SEND_TIMEOUT,
                &lead.id,
            )
            .await,
        )
    };

    let email = async {
        if !lead.is_mail {
            return None;
        }
        let recipients = resolve_recipients(
            entry.map(|e| e.emails.as_slice()).unwrap_or(&empty),
            &config.defaults.emails,
        );
        let message = render(lead, style, Markup::Plain);
        Some(
            run_channel(
                "email",
                channels.email.as_ref(),
                recipients,
                message,
                EMAIL_SEND_TIMEOUT,
                &lead.id,
            )
            .await,
        )
    };

    let (telegram, email) = tokio::join!(telegram, email);
    let report = DeliveryReport { telegram, email };
    log_report(&lead.id, &report);
    report
}

fn log_report(lead_id: &str, report: &DeliveryReport) {
    for channel in [&report.telegram, &report.email].into_iter().flatten() {
        let sent = channel.attempts.iter().filter(|o| o.success()).count();
        if channel.ok() {
            log::info!(
                "lead #{}: {} delivery ok ({}/{} recipients)",
                lead_id,
                channel.channel,
                sent,
                channel.attempts.len()
            );
        } else {
            log::warn!(
                "lead #{}: {} delivery failed ({}/{} recipients)",
                lead_id,
                channel.channel,
                sent,
                channel.attempts.len()
            );
        }
    }
}
