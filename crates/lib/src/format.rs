//! Notification message rendering.
//!
//! Two layouts: `Form` (full field list for site form submissions) and `Chat`
//! (source, time, id, and text only — conversational sources carry no
//! name/phone/email). Markup is orthogonal to layout: Telegram gets HTML
//! bold labels, email gets plain text. Label text matches the messages the
//! operators already receive from the previous system.

use crate::lead::LeadSubmission;
use chrono::{DateTime, Local};

/// Which layout to render: full form fields or bare chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Form,
    Chat,
}

impl Style {
    pub fn for_lead(lead: &LeadSubmission) -> Self {
        if lead.is_form {
            Style::Form
        } else {
            Style::Chat
        }
    }
}

/// Presentation markup: Telegram parse_mode=HTML vs plain text email bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    Html,
    Plain,
}

/// A rendered notification: subject is used by the email channel only.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub subject: String,
    pub body: String,
}

/// Escape text interpolated into a parse_mode=HTML payload. Telegram rejects
/// messages with unbalanced angle brackets in them otherwise.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Render with the current local time.
pub fn render(lead: &LeadSubmission, style: Style, markup: Markup) -> OutboundMessage {
    render_at(lead, style, markup, Local::now())
}

/// Render with an explicit timestamp (deterministic; used by tests).
pub fn render_at(
    lead: &LeadSubmission,
    style: Style,
    markup: Markup,
    now: DateTime<Local>,
) -> OutboundMessage {
    let ts = now.format("%d.%m.%Y %H:%M:%S").to_string();
    let subject = match style {
        Style::Form => format!("Новая заявка с сайта {}", lead.source),
        Style::Chat => format!("Новый лид с чата {}", lead.source),
    };
    let body = match markup {
        Markup::Html => {
            let esc = escape_html;
            match style {
                Style::Form => format!(
                    "🔔 <b>Новая заявка</b>\n\n\
                     🌐 <b>Сайт:</b> {}\n\
                     📝 <b>Форма:</b> {}\n\
                     👤 <b>Имя:</b> {}\n\
                     📞 <b>Телефон:</b> {}\n\
                     📧 <b>Email:</b> {}\n\
                     🕐 <b>Время:</b> {}\n\
                     🆔 <b>ID:</b> {}\n\
                     {}",
                    esc(&lead.source),
                    esc(&lead.campaign),
                    esc(&lead.name),
                    esc(&lead.phone),
                    esc(&lead.email),
                    ts,
                    lead.id,
                    esc(&lead.text),
                ),
                Style::Chat => format!(
                    "🔔 <b>Новый лид</b>\n\n\
                     🌐 <b>Чат:</b> {}\n\
                     🕐 <b>Время:</b> {}\n\
                     🆔 <b>ID:</b> {}\n\
                     {}",
                    esc(&lead.source),
                    ts,
                    lead.id,
                    esc(&lead.text),
                ),
            }
        }
        Markup::Plain => match style {
            Style::Form => format!(
                "Сайт: {}\nФорма: {}\nИмя: {}\nТелефон: {}\nEmail: {}\nДата: {}\nID заявки: {}\n{}",
                lead.source,
                lead.campaign,
                lead.name,
                lead.phone,
                lead.email,
                ts,
                lead.id,
                lead.text,
            ),
            Style::Chat => format!(
                "Чат: {}\nДата: {}\nID заявки: {}\n{}",
                lead.source, ts, lead.id, lead.text,
            ),
        },
    };
    OutboundMessage { subject, body }
}
