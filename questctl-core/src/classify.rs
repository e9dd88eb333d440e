//! Action classification: one free-text quest message in, one structured
//! action record out (or nothing, when no verb matches).
//!
//! Each verb has its own detector, a small pure function from text to
//! optional fields, run in a fixed order. Records are built once,
//! immutably; detectors never stamp fields onto a shared object.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::chat::ChatMessage;
use crate::error::{QuestError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Casts,
    Attacks,
    Found,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verb::Casts => "casts",
            Verb::Attacks => "attacks",
            Verb::Found => "found",
        };
        f.write_str(s)
    }
}

/// One participant action, derived from a single chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRecord {
    pub user: String,
    pub verb: Verb,
    /// Spell name, monster name, or item name depending on the verb.
    pub target: String,
    /// Damage dealt (attacks) or item count (found).
    pub damage: Option<f64>,
    /// Collateral damage to the party, attacks only.
    pub party_damage: Option<f64>,
    /// Inherited from the source message, milliseconds since epoch.
    pub timestamp: i64,
}

// Numeric amounts always read "<n> damage" in attack messages, whether the
// clause is "for 10.5 damage" or "takes 2.1 damage".
static DAMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?) damage").expect("damage regex"));

static FOUND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?)\s+(.+?)[.!]?\s*$").expect("found regex"));

/// Classify one message. `Ok(None)` means no verb matched (the message is
/// simply not an action); `Err` means a verb matched but an expected field
/// was missing or malformed, which is a data-quality problem to surface.
///
/// Pure in the message text and timestamp; detector order only matters for
/// the degenerate case of a message matching several verbs at once, where
/// the first match wins.
pub fn classify(message: &ChatMessage) -> Result<Option<ActionRecord>> {
    let detectors: [fn(&str, i64) -> Result<Option<ActionRecord>>; 3] =
        [detect_cast, detect_attack, detect_found];

    for detect in detectors {
        if let Some(record) = detect(&message.text, message.timestamp)? {
            return Ok(Some(record));
        }
    }
    Ok(None)
}

/// Classify a whole quest window. Messages that fail field extraction are
/// logged and skipped rather than aborting the report.
pub fn classify_all(messages: &[ChatMessage]) -> Vec<ActionRecord> {
    let mut records = Vec::new();
    for message in messages {
        match classify(message) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(err) => warn!(text = %message.text, %err, "skipping unparseable action message"),
        }
    }
    records
}

/// Strip the service's backtick name formatting and surrounding space.
fn clean_user(raw: &str) -> String {
    raw.replace('`', "").trim().to_string()
}

fn detect_cast(text: &str, timestamp: i64) -> Result<Option<ActionRecord>> {
    let Some(idx) = text.find(" casts ") else {
        return Ok(None);
    };
    let user = clean_user(&text[..idx]);
    let mut target = &text[idx + " casts ".len()..];

    // Party-wide buffs read "casts X for the party.", targeted buffs
    // "casts X on Y."; the spell name is whatever precedes either cut.
    if let Some(cut) = target.find(" for the party.") {
        target = &target[..cut];
    }
    if let Some(cut) = target.find(" on ") {
        target = &target[..cut];
    }
    let target = target.trim_end_matches(['.', '!']).trim();

    if user.is_empty() || target.is_empty() {
        return Err(QuestError::message_parse(text, "cast missing user or spell name"));
    }

    Ok(Some(ActionRecord {
        user,
        verb: Verb::Casts,
        target: target.to_string(),
        damage: None,
        party_damage: None,
        timestamp,
    }))
}

fn detect_attack(text: &str, timestamp: i64) -> Result<Option<ActionRecord>> {
    let Some(idx) = text.find(" attacks ") else {
        return Ok(None);
    };
    let user = clean_user(&text[..idx]);
    let rest = &text[idx + " attacks ".len()..];

    let target = match rest.find(" for") {
        Some(cut) => rest[..cut].trim(),
        None => return Err(QuestError::message_parse(text, "attack missing damage clause")),
    };

    let mut amounts = DAMAGE_RE
        .captures_iter(rest)
        .filter_map(|c| c.get(1)?.as_str().parse::<f64>().ok());
    let damage = amounts
        .next()
        .ok_or_else(|| QuestError::message_parse(text, "attack missing damage amount"))?;
    let party_damage = amounts.next();

    if user.is_empty() || target.is_empty() {
        return Err(QuestError::message_parse(text, "attack missing user or target"));
    }

    Ok(Some(ActionRecord {
        user,
        verb: Verb::Attacks,
        target: target.to_string(),
        damage: Some(damage),
        party_damage,
        timestamp,
    }))
}

fn detect_found(text: &str, timestamp: i64) -> Result<Option<ActionRecord>> {
    let Some(idx) = text.find(" found ") else {
        return Ok(None);
    };
    let user = clean_user(&text[..idx]);
    let rest = &text[idx + " found ".len()..];

    let caps = FOUND_RE
        .captures(rest)
        .ok_or_else(|| QuestError::message_parse(text, "found missing item count"))?;
    let count: f64 = caps[1]
        .parse()
        .map_err(|_| QuestError::message_parse(text, "found count not numeric"))?;
    let item = caps[2].trim().to_string();

    if user.is_empty() || item.is_empty() {
        return Err(QuestError::message_parse(text, "found missing user or item name"));
    }

    Ok(Some(ActionRecord {
        user,
        verb: Verb::Found,
        target: item,
        damage: Some(count),
        party_damage: None,
        timestamp,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_text(text: &str) -> Result<Option<ActionRecord>> {
        classify(&ChatMessage::system(text, 1_000))
    }

    #[test]
    fn test_attack_with_party_damage() {
        let record = classify_text(
            "`Alice` attacks Dragon for 10.5 damage and the party takes 2.1 damage.",
        )
        .unwrap()
        .unwrap();
        assert_eq!(record.user, "Alice");
        assert_eq!(record.verb, Verb::Attacks);
        assert_eq!(record.target, "Dragon");
        assert_eq!(record.damage, Some(10.5));
        assert_eq!(record.party_damage, Some(2.1));
        assert_eq!(record.timestamp, 1_000);
    }

    #[test]
    fn test_attack_without_party_damage() {
        let record = classify_text("`Bob` attacks Rat for 3.0 damage.")
            .unwrap()
            .unwrap();
        assert_eq!(record.damage, Some(3.0));
        assert_eq!(record.party_damage, None);
    }

    #[test]
    fn test_targeted_cast() {
        let record = classify_text("`Bob` casts Blessing on the party.")
            .unwrap()
            .unwrap();
        assert_eq!(record.user, "Bob");
        assert_eq!(record.verb, Verb::Casts);
        assert_eq!(record.target, "Blessing");
        assert_eq!(record.damage, None);
    }

    #[test]
    fn test_party_wide_cast() {
        let record = classify_text("`Cara` casts Protective Aura for the party.")
            .unwrap()
            .unwrap();
        assert_eq!(record.target, "Protective Aura");
    }

    #[test]
    fn test_found_items() {
        let record = classify_text("`Dave` found 3 Healing Potions.")
            .unwrap()
            .unwrap();
        assert_eq!(record.user, "Dave");
        assert_eq!(record.verb, Verb::Found);
        assert_eq!(record.damage, Some(3.0));
        assert_eq!(record.target, "Healing Potions");
    }

    #[test]
    fn test_non_action_message_yields_nothing() {
        assert!(classify_text("gg everyone, great quest").unwrap().is_none());
        assert!(classify_text("Your Quest, Dragon Hunt, has Started!")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_malformed_attack_is_a_parse_error() {
        let err = classify_text("`Alice` attacks Dragon very hard").unwrap_err();
        assert!(matches!(err, QuestError::MessageParse { .. }));
    }

    #[test]
    fn test_malformed_found_is_a_parse_error() {
        let err = classify_text("`Alice` found some things maybe").unwrap_err();
        assert!(matches!(err, QuestError::MessageParse { .. }));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let a = classify_text("`Alice` attacks Dragon for 10.0 damage.").unwrap();
        let b = classify_text("`Alice` attacks Dragon for 10.0 damage.").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_classify_all_skips_bad_messages() {
        let messages = vec![
            ChatMessage::system("`Alice` attacks Dragon for 10.0 damage.", 1),
            ChatMessage::system("`Bob` attacks Dragon very hard", 2),
            ChatMessage::system("`Cara` casts Blessing on the party.", 3),
        ];
        let records = classify_all(&messages);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user, "Alice");
        assert_eq!(records[1].user, "Cara");
    }
}
