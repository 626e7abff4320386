//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.leadgate/config.json`) and environment.
//! Loaded once at startup and treated as immutable for the process lifetime;
//! per-request code only reads it through an `Arc`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Registered lead sources keyed by source id (site/integration name).
    #[serde(default)]
    pub sources: HashMap<String, SourceEntry>,

    /// Process-wide recipient lists appended to every per-source list.
    #[serde(default)]
    pub defaults: DefaultRecipients,

    /// Keywords whose presence in free text rejects a lead as spam.
    #[serde(default = "default_spam_words")]
    pub spam_words: Vec<String>,

    /// Telegram delivery settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// SMTP delivery settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
}

/// HTTP bind address and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for the lead intake endpoint (default 8000).
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0" — the service fronts public web forms).
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

fn default_server_port() -> u16 {
    8000
}

fn default_server_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

/// Routing entry for one registered source: shared key plus recipient lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    /// Shared secret the source must supply as `api_key`.
    pub api_key: String,

    /// Telegram chat ids notified for this source (defaults are appended).
    #[serde(default)]
    pub telegram_chats: Vec<String>,

    /// Email addresses notified for this source (defaults are appended).
    #[serde(default)]
    pub emails: Vec<String>,
}

/// Process-wide recipients, always notified in addition to per-source lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultRecipients {
    #[serde(default)]
    pub telegram_chats: Vec<String>,

    #[serde(default)]
    pub emails: Vec<String>,
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramConfig {
    /// Bot token from BotFather. Overridden by TELEGRAM_BOT_TOKEN env when set.
    pub bot_token: Option<String>,

    /// Bot API base URL; override for tests or a local bot-api server.
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: default_telegram_api_base(),
        }
    }
}

/// SMTP relay settings. One session is opened per outgoing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtpConfig {
    /// Relay host; email delivery is disabled when empty.
    #[serde(default)]
    pub host: String,

    /// Relay port (default 587, STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub username: String,

    /// Relay password. Overridden by SMTP_PASSWORD env when set.
    pub password: Option<String>,

    /// From address for notification mail.
    #[serde(default)]
    pub from: String,
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_smtp_port(),
            username: String::new(),
            password: None,
            from: String::new(),
        }
    }
}

/// Spam keywords shipped as a default; deployments extend via config.
fn default_spam_words() -> Vec<String> {
    [
        "casino", "казино", "porn", "viagra", "виагра", "crypto bonus", "займ онлайн", "ставки на спорт",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// Resolve the Telegram bot token: env TELEGRAM_BOT_TOKEN overrides config.
pub fn resolve_telegram_token(config: &Config) -> Option<String> {
    env_nonempty("TELEGRAM_BOT_TOKEN").or_else(|| {
        config
            .telegram
            .bot_token
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Resolve the SMTP password: env SMTP_PASSWORD overrides config.
pub fn resolve_smtp_password(config: &Config) -> Option<String> {
    env_nonempty("SMTP_PASSWORD").or_else(|| {
        config
            .smtp
            .password
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Recipients for one channel of one source: per-source list copied, then
/// defaults appended. Never extends a list owned by the config in place.
pub fn resolve_recipients(source_list: &[String], default_list: &[String]) -> Vec<String> {
    let mut out = source_list.to_vec();
    out.extend(default_list.iter().cloned());
    out
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("LEADGATE_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".leadgate").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or LEADGATE_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
