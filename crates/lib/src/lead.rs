//! Lead submission wire type.
//!
//! Field names match what the submitting sites already send (`api_key`,
//! `is_telegram`, `is_mail`, `is_form`). Unknown fields are ignored. The `id`
//! is always assigned server-side; a caller-supplied value is discarded.

use serde::{Deserialize, Serialize};

/// An inbound lead: a structured form submission (`is_form`) or a raw chat
/// message. Immutable after intake assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSubmission {
    /// Assigned by the intake pipeline; never trusted from the caller.
    #[serde(default, skip_deserializing)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub text: String,

    /// Submitting site/integration id; required (checked by the validator).
    #[serde(default)]
    pub source: String,

    /// Campaign or form name shown in form-style notifications.
    #[serde(default)]
    pub campaign: String,

    /// Shared secret for `source`; required (checked by the validator).
    #[serde(default)]
    pub api_key: String,

    /// Form submission (form template) vs raw chat message (chat template).
    #[serde(default = "default_true")]
    pub is_form: bool,

    /// Deliver to the Telegram channel.
    #[serde(default)]
    pub is_telegram: bool,

    /// Deliver to the email channel.
    #[serde(default)]
    pub is_mail: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LeadSubmission {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            text: String::new(),
            source: String::new(),
            campaign: String::new(),
            api_key: String::new(),
            is_form: true,
            is_telegram: false,
            is_mail: false,
        }
    }
}
