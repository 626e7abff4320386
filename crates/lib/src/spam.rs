//! Keyword spam filter over the free-text fields of a lead.

use crate::lead::LeadSubmission;

/// First configured keyword contained in the lead's name or text, compared
/// case-insensitively as a plain substring (a keyword matches inside a larger
/// word). `None` means not spam.
pub fn spam_keyword<'a>(lead: &LeadSubmission, words: &'a [String]) -> Option<&'a str> {
    let combined = format!("{}\n{}", lead.name, lead.text).to_lowercase();
    words
        .iter()
        .find(|w| !w.is_empty() && combined.contains(&w.to_lowercase()))
        .map(|w| w.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn lead_with(name: &str, text: &str) -> LeadSubmission {
        LeadSubmission {
            name: name.to_string(),
            text: text.to_string(),
            ..LeadSubmission::default()
        }
    }

    #[test]
    fn matches_are_case_insensitive() {
        let w = words(&["casino"]);
        assert_eq!(spam_keyword(&lead_with("", "CASINO BEST"), &w), Some("casino"));
        assert_eq!(spam_keyword(&lead_with("", "Лучшее Casino в интернете!"), &w), Some("casino"));
    }

    #[test]
    fn matches_inside_larger_words() {
        let w = words(&["casino"]);
        assert_eq!(
            spam_keyword(&lead_with("", "bonus-casino-promo"), &w),
            Some("casino")
        );
    }

    #[test]
    fn name_field_is_scanned_too() {
        let w = words(&["porn"]);
        assert_eq!(
            spam_keyword(&lead_with("porn site promotion", "обычный текст"), &w),
            Some("porn")
        );
    }

    #[test]
    fn clean_text_passes() {
        let w = words(&["casino", "porn"]);
        assert_eq!(spam_keyword(&lead_with("Иван", "Хочу заказать услугу"), &w), None);
    }

    #[test]
    fn filter_is_idempotent() {
        let w = words(&["casino"]);
        let lead = lead_with("", "casino");
        assert_eq!(spam_keyword(&lead, &w), spam_keyword(&lead, &w));
    }
}
