//! Lead validation: source registration, shared key, email and phone format.
//!
//! Checks run in a fixed order and short-circuit on the first failure so a
//! rejection always carries exactly one reason. The reason is structural and
//! stays in logs; HTTP callers only ever see a generic error message.

use crate::config::Config;
use crate::lead::LeadSubmission;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Why a submission was rejected. Logged, never echoed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("missing source")]
    MissingSource,
    #[error("missing api_key")]
    MissingApiKey,
    #[error("source is not registered")]
    UnknownSource,
    #[error("api_key does not match the registered key")]
    ApiKeyMismatch,
    #[error("email failed format or blacklist check")]
    InvalidEmail,
    #[error("phone failed format check")]
    InvalidPhone,
    #[error("text matched a spam keyword")]
    Spam,
}

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").expect("email regex")
});

/// Fragments of disposable-mail providers. Matched as substrings of the whole
/// lowercased address, not just the domain.
const DISPOSABLE_FRAGMENTS: &[&str] = &[
    "tempmail.",
    "temp-mail.",
    "10minutemail.",
    "guerrillamail.",
    "mailinator.",
    "throwaway.",
    "spambox.",
    "trashmail.",
];

/// Empty email is fine (the field is optional). Otherwise the address must
/// pass the syntax check and contain no disposable-provider fragment.
pub fn is_email_valid(email: &str) -> bool {
    if email.is_empty() {
        return true;
    }
    if !EMAIL_RE.is_match(email) {
        return false;
    }
    let lower = email.to_lowercase();
    !DISPOSABLE_FRAGMENTS.iter().any(|f| lower.contains(f))
}

/// Russian phone check. Empty phone is fine. All non-digits are stripped,
/// then the digit count and leading digit decide:
/// 6 or 7 digits (local number), 10 digits starting with 9 (mobile without
/// country code), 11 digits starting with 7 or 8 (full national number),
/// 12 digits starting with 7 ("+7" written without the plus).
pub fn is_phone_valid(phone: &str) -> bool {
    if phone.is_empty() {
        return true;
    }
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    // Unreachable after the digit filter, but guard anyway.
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let first = digits.as_bytes()[0];
    match digits.len() {
        6 | 7 => true,
        10 => first == b'9',
        11 => first == b'7' || first == b'8',
        12 => first == b'7',
        _ => false,
    }
}

/// Validate a submission against the source registry. Short-circuits on the
/// first failing check; optional fields are only checked when present.
pub fn validate(lead: &LeadSubmission, config: &Config) -> Result<(), RejectReason> {
    if lead.source.is_empty() {
        return Err(RejectReason::MissingSource);
    }
    if lead.api_key.is_empty() {
        return Err(RejectReason::MissingApiKey);
    }
    let entry = config
        .sources
        .get(&lead.source)
        .ok_or(RejectReason::UnknownSource)?;
    if entry.api_key != lead.api_key {
        return Err(RejectReason::ApiKeyMismatch);
    }
    if !is_email_valid(&lead.email) {
        return Err(RejectReason::InvalidEmail);
    }
    if !is_phone_valid(&lead.phone) {
        return Err(RejectReason::InvalidPhone);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceEntry;

    fn config_with_source(source: &str, key: &str) -> Config {
        let mut config = Config::default();
        config.sources.insert(
            source.to_string(),
            SourceEntry {
                api_key: key.to_string(),
                ..SourceEntry::default()
            },
        );
        config
    }

    fn lead(source: &str, key: &str) -> LeadSubmission {
        LeadSubmission {
            source: source.to_string(),
            api_key: key.to_string(),
            ..LeadSubmission::default()
        }
    }

    #[test]
    fn phone_table() {
        // valid
        for phone in [
            "",
            "123456",
            "1234567",
            "9161234567",
            "79161234567",
            "89161234567",
            "779161234567",
            "+7 (916) 123-45-67", // 11 digits, leading 7
        ] {
            assert!(is_phone_valid(phone), "expected valid: {:?}", phone);
        }
        // invalid
        for phone in [
            "123",
            "12345",
            "12345678",
            "123456789",
            "1234567890",     // 10 digits, not leading 9
            "(495) 123-4567", // 10 digits, leading 4
            "21234567890",    // 11 digits, bad lead
            "612345678901",   // 12 digits, bad lead
            "12345678901234567890",
            "abc", // strips to empty
        ] {
            assert!(!is_phone_valid(phone), "expected invalid: {:?}", phone);
        }
    }

    #[test]
    fn phone_stripping_removes_every_non_digit() {
        assert!(is_phone_valid("8 (916) 123-45-67"));
        assert!(is_phone_valid("9-1-6-1-2-3-4-5-6-7"));
    }

    #[test]
    fn email_syntax_and_blacklist() {
        assert!(is_email_valid(""));
        assert!(is_email_valid("user+tag@site.co.uk"));
        assert!(is_email_valid("ivan@example.com"));
        assert!(!is_email_valid("not-an-email"));
        assert!(!is_email_valid("no-domain@"));
        assert!(!is_email_valid("fake@mailinator.org"));
        // fragment anywhere in the address, any case
        assert!(!is_email_valid("tempmail.user@example.com"));
        assert!(!is_email_valid("fake@MAILINATOR.com"));
    }

    #[test]
    fn unknown_source_rejects_before_key_comparison() {
        let config = config_with_source("baget", "k1");
        let l = lead("nope", "k1");
        assert_eq!(validate(&l, &config), Err(RejectReason::UnknownSource));
    }

    #[test]
    fn key_mismatch_is_distinct_from_unknown_source() {
        let config = config_with_source("baget", "k1");
        let l = lead("baget", "wrong");
        assert_eq!(validate(&l, &config), Err(RejectReason::ApiKeyMismatch));
    }

    #[test]
    fn empty_key_never_matches() {
        let mut config = Config::default();
        config.sources.insert(
            "baget".to_string(),
            SourceEntry {
                api_key: "secret".to_string(),
                ..SourceEntry::default()
            },
        );
        assert_eq!(
            validate(&lead("baget", ""), &config),
            Err(RejectReason::MissingApiKey)
        );
    }

    #[test]
    fn check_order_is_deterministic() {
        let config = config_with_source("baget", "k1");
        let mut l = lead("", "");
        assert_eq!(validate(&l, &config), Err(RejectReason::MissingSource));
        l.source = "baget".to_string();
        assert_eq!(validate(&l, &config), Err(RejectReason::MissingApiKey));
        l.api_key = "k1".to_string();
        l.email = "bad".to_string();
        l.phone = "123".to_string();
        // email is checked before phone
        assert_eq!(validate(&l, &config), Err(RejectReason::InvalidEmail));
        l.email = String::new();
        assert_eq!(validate(&l, &config), Err(RejectReason::InvalidPhone));
    }

    #[test]
    fn validator_is_idempotent() {
        let config = config_with_source("baget", "k1");
        let mut l = lead("baget", "k1");
        l.phone = "79161234567".to_string();
        assert_eq!(validate(&l, &config), validate(&l, &config));
    }
}
