//! Intake pipeline: assign an id, validate, spam-filter, accept or reject.

use crate::config::Config;
use crate::lead::LeadSubmission;
use crate::spam::spam_keyword;
use crate::validate::{validate, RejectReason};

/// Result of running a raw submission through the pipeline.
#[derive(Debug, Clone)]
pub enum IntakeOutcome {
    /// Lead passed validation and the spam filter; ready for dispatch.
    Accepted(LeadSubmission),
    /// Lead rejected; the reason is for logs only.
    Rejected {
        lead: LeadSubmission,
        reason: RejectReason,
    },
}

impl IntakeOutcome {
    pub fn lead(&self) -> &LeadSubmission {
        match self {
            IntakeOutcome::Accepted(lead) => lead,
            IntakeOutcome::Rejected { lead, .. } => lead,
        }
    }
}

/// Run intake on a raw submission. Always assigns a fresh id first so every
/// log line about this submission carries it.
pub fn intake(mut lead: LeadSubmission, config: &Config) -> IntakeOutcome {
    lead.id = uuid::Uuid::new_v4().to_string();

    if let Err(reason) = validate(&lead, config) {
        log::info!("lead #{} rejected: {}", lead.id, reason);
        return IntakeOutcome::Rejected { lead, reason };
    }

    if let Some(word) = spam_keyword(&lead, &config.spam_words) {
        log::info!("lead #{} rejected as spam: matched keyword {:?}", lead.id, word);
        return IntakeOutcome::Rejected {
            lead,
            reason: RejectReason::Spam,
        };
    }

    log::debug!("lead #{} accepted (source {})", lead.id, lead.source);
    IntakeOutcome::Accepted(lead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceEntry;

    fn config() -> Config {
        let mut config = Config::default();
        config.spam_words = vec!["casino".to_string()];
        config.sources.insert(
            "baget".to_string(),
            SourceEntry {
                api_key: "k1".to_string(),
                ..SourceEntry::default()
            },
        );
        config
    }

    fn lead() -> LeadSubmission {
        LeadSubmission {
            source: "baget".to_string(),
            api_key: "k1".to_string(),
            ..LeadSubmission::default()
        }
    }

    #[test]
    fn accepted_lead_gets_a_fresh_id() {
        let config = config();
        let out = intake(lead(), &config);
        match out {
            IntakeOutcome::Accepted(l) => assert!(!l.id.is_empty()),
            other => panic!("expected accept, got {:?}", other),
        }
    }

    #[test]
    fn ids_are_unique_per_submission() {
        let config = config();
        let a = intake(lead(), &config).lead().id.clone();
        let b = intake(lead(), &config).lead().id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_lead_carries_validator_reason() {
        let config = config();
        let mut l = lead();
        l.api_key = "wrong".to_string();
        match intake(l, &config) {
            IntakeOutcome::Rejected { reason, .. } => {
                assert_eq!(reason, RejectReason::ApiKeyMismatch)
            }
            other => panic!("expected reject, got {:?}", other),
        }
    }

    #[test]
    fn spam_runs_only_after_validation() {
        let config = config();
        // Spam text plus bad key: the validator reason wins.
        let mut l = lead();
        l.api_key = "wrong".to_string();
        l.text = "best casino!".to_string();
        match intake(l, &config) {
            IntakeOutcome::Rejected { reason, .. } => {
                assert_eq!(reason, RejectReason::ApiKeyMismatch)
            }
            other => panic!("expected reject, got {:?}", other),
        }
    }

    #[test]
    fn spam_text_is_rejected() {
        let config = config();
        let mut l = lead();
        l.text = "best casino!".to_string();
        match intake(l, &config) {
            IntakeOutcome::Rejected { reason, .. } => assert_eq!(reason, RejectReason::Spam),
            other => panic!("expected reject, got {:?}", other),
        }
    }
}
