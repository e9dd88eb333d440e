//! Pending-quest escalation: detecting the "invited but not started"
//! state and choosing between posting a notice, force-starting the quest,
//! or privately escalating to the leaders.
//!
//! The decision pieces are pure functions over timestamps so every branch
//! of the four-way decision is independently testable; the orchestration
//! that wires them to the API lives in `run`.

use crate::chat::{ChatMessage, GroupInfo, InboxMessage};
use crate::window::is_completion_message;

/// Slack subtracted from the timer so an hourly cron firing slightly early
/// still escalates on the intended run.
pub const TIMER_EPSILON_HOURS: f64 = 0.1;

const MS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestState {
    /// No quest pending or active.
    None,
    /// Invites sent, quest not started.
    Pending,
    Active,
}

/// Pending means a quest key is set but the quest is not flagged active.
pub fn quest_state(info: &GroupInfo) -> QuestState {
    match (info.quest.active, info.quest.key.is_some()) {
        (true, _) => QuestState::Active,
        (false, true) => QuestState::Pending,
        (false, false) => QuestState::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingStep {
    /// Notice is recent enough; wait.
    Noop,
    /// No notice posted since the last quest ended; post one.
    PostNotice,
    /// Notice has aged past the timer; try to force-start.
    AttemptStart,
}

/// Choose the next step from the notice timestamp (None when no notice has
/// been posted since the prior quest completed) and the configured timer.
pub fn pending_step(notice_ts: Option<i64>, now_ms: i64, timer_hours: f64) -> PendingStep {
    match notice_ts {
        None => PendingStep::PostNotice,
        Some(ts) => {
            let elapsed_hours = (now_ms - ts) as f64 / MS_PER_HOUR;
            if elapsed_hours > timer_hours - TIMER_EPSILON_HOURS {
                PendingStep::AttemptStart
            } else {
                PendingStep::Noop
            }
        }
    }
}

/// Timestamp of the last quest completion in the transcript, the reference
/// point after which a pending notice counts.
pub fn last_completion_ts(transcript: &[ChatMessage]) -> Option<i64> {
    transcript
        .iter()
        .filter(|m| is_completion_message(&m.text))
        .map(|m| m.timestamp)
        .max()
}

/// Most recent notice carrying `header`, restricted to notices newer than
/// `since` (the prior quest's completion) when one exists.
pub fn latest_notice_ts(transcript: &[ChatMessage], header: &str, since: Option<i64>) -> Option<i64> {
    transcript
        .iter()
        .filter(|m| m.text.contains(header))
        .filter(|m| since.map_or(true, |s| m.timestamp > s))
        .map(|m| m.timestamp)
        .max()
}

/// True when an identical escalation message already sits in the account's
/// inbox with a timestamp after the notice. Prevents re-sending private
/// messages on every scheduled run.
pub fn escalation_already_sent(inbox: &[InboxMessage], text: &str, notice_ts: i64) -> bool {
    inbox
        .iter()
        .any(|m| m.timestamp > notice_ts && m.text == text)
}
