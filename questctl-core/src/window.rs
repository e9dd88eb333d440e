//! Quest window extraction: locating the boundary messages of the Nth most
//! recent quest in a transcript and slicing the transcript to that range.
//!
//! The service returns transcripts newest-first, but nothing here relies on
//! position: boundaries are chosen by timestamp and the window is filtered
//! by timestamp range, so out-of-order entries are tolerated.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::chat::ChatMessage;
use crate::error::{QuestError, Result};

static QUEST_STARTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Quest.*Started").expect("quest start regex"));

// Two phrasings for the same system message; the second is the older one
// and still appears in archived transcripts.
const COMPLETION_MARKERS: [&str; 2] = ["receive the rewards", "received their rewards"];

pub fn is_start_message(text: &str) -> bool {
    QUEST_STARTED_RE.is_match(text)
}

pub fn is_completion_message(text: &str) -> bool {
    COMPLETION_MARKERS.iter().any(|m| text.contains(m))
}

/// A contiguous slice of transcript bounded by a quest start message and,
/// for completed quests, the completion message. Messages are sorted
/// ascending by timestamp regardless of the transcript's own order.
#[derive(Debug, Clone)]
pub struct QuestWindow {
    pub messages: Vec<ChatMessage>,
    pub start: ChatMessage,
    /// None for an in-progress quest (history index 0).
    pub completion: Option<ChatMessage>,
}

impl QuestWindow {
    /// Quest name lifted out of the completion message, which reads
    /// "... quest, <name>, has ...". None for in-progress windows or
    /// unexpected phrasing.
    pub fn quest_name(&self) -> Option<String> {
        let text = &self.completion.as_ref()?.text;
        let after = &text[text.find("quest, ")? + "quest, ".len()..];
        let name = &after[..after.find(", has ")?];
        Some(name.to_string())
    }
}

/// Extract the window for the `history`-th most recent completed quest,
/// or the in-progress quest when `history == 0`.
///
/// Fails with `NotFound` when the transcript has no matching start (or,
/// for `history > 0`, completion) message. Callers treat that as "no quest
/// data available", not a fault.
pub fn extract_window(transcript: &[ChatMessage], history: usize) -> Result<QuestWindow> {
    if history == 0 {
        let start = transcript
            .iter()
            .filter(|m| is_start_message(&m.text))
            .max_by_key(|m| m.timestamp)
            .ok_or_else(|| QuestError::not_found("quest start message"))?
            .clone();

        let mut messages: Vec<ChatMessage> = transcript
            .iter()
            .filter(|m| m.timestamp >= start.timestamp)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.timestamp);

        return Ok(QuestWindow {
            messages,
            start,
            completion: None,
        });
    }

    let mut completions: Vec<&ChatMessage> = transcript
        .iter()
        .filter(|m| is_completion_message(&m.text))
        .collect();
    completions.sort_by_key(|m| std::cmp::Reverse(m.timestamp));

    let completion = completions
        .get(history - 1)
        .copied()
        .ok_or_else(|| QuestError::not_found("quest completion message"))?
        .clone();

    let start = transcript
        .iter()
        .filter(|m| is_start_message(&m.text) && m.timestamp < completion.timestamp)
        .max_by_key(|m| m.timestamp)
        .ok_or_else(|| QuestError::not_found("quest start message"))?
        .clone();

    let mut messages: Vec<ChatMessage> = transcript
        .iter()
        .filter(|m| m.timestamp >= start.timestamp && m.timestamp <= completion.timestamp)
        .cloned()
        .collect();
    messages.sort_by_key(|m| m.timestamp);

    Ok(QuestWindow {
        messages,
        start,
        completion: Some(completion),
    })
}
