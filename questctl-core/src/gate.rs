//! Idempotence gate: decides whether a report still needs posting for the
//! current quest cycle, by comparing the most recent prior report in the
//! transcript against the newest classified record.

use crate::chat::ChatMessage;
use crate::classify::ActionRecord;

/// True when no prior report carrying `header` exists, or the prior report
/// predates the window's newest record. False when there is nothing to
/// report at all, or a report for this cycle was already posted. Scheduled
/// re-runs before a new quest completes therefore no-op.
pub fn report_needed(transcript: &[ChatMessage], records: &[ActionRecord], header: &str) -> bool {
    let Some(latest_record) = records.iter().map(|r| r.timestamp).max() else {
        return false;
    };
    let prior_report = transcript
        .iter()
        .filter(|m| m.text.contains(header))
        .map(|m| m.timestamp)
        .max();

    match prior_report {
        None => true,
        Some(posted) => posted < latest_record,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ActionRecord, Verb};

    fn attack(ts: i64) -> ActionRecord {
        ActionRecord {
            user: "Alice".to_string(),
            verb: Verb::Attacks,
            target: "Dragon".to_string(),
            damage: Some(1.0),
            party_damage: None,
            timestamp: ts,
        }
    }

    #[test]
    fn test_needed_when_no_prior_report() {
        let transcript = vec![ChatMessage::system("chatter", 100)];
        assert!(report_needed(&transcript, &[attack(200)], "Quest Report"));
    }

    #[test]
    fn test_suppressed_after_posting() {
        let mut transcript = vec![ChatMessage::system("chatter", 100)];
        let records = vec![attack(200)];
        assert!(report_needed(&transcript, &records, "Quest Report"));

        // simulate the posted report landing in the transcript
        transcript.push(ChatMessage::system("**Quest Report: Dragon Hunt**", 300));
        assert!(!report_needed(&transcript, &records, "Quest Report"));
    }

    #[test]
    fn test_needed_again_after_newer_quest() {
        let transcript = vec![ChatMessage::system("**Quest Report: Dragon Hunt**", 300)];
        // a newer quest produced records after the old report
        assert!(report_needed(&transcript, &[attack(400)], "Quest Report"));
    }

    #[test]
    fn test_nothing_to_report() {
        assert!(!report_needed(&[], &[], "Quest Report"));
    }
}
