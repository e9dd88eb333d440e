//! Scheduled entry points: the quest report and the pending-quest check.
//!
//! Both are idempotent per invocation. The report run is gated on the
//! transcript itself (a posted report suppresses the next run until a new
//! quest completes); the pending run dedups its notice against the chat
//! and its private escalations against the account's inbox.

use tracing::{debug, info, warn};

use crate::api::PartyApi;
use crate::classify::classify_all;
use crate::config::QuestConfig;
use crate::error::Result;
use crate::escalation::{
    last_completion_ts, latest_notice_ts, pending_step, quest_state, escalation_already_sent,
    PendingStep, QuestState,
};
use crate::gate::report_needed;
use crate::queue::QuestQueue;
use crate::report::{format_report, to_chat_markdown};
use crate::time::now_ms;
use crate::window::extract_window;

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Mirror the report to the configured secondary group.
    pub post_to_secondary: bool,
    /// After posting, consume the head of the quest queue and post a
    /// reminder naming who starts the next quest.
    pub queue_reminder: bool,
    /// Render to stdout instead of posting.
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct PendingOptions {
    /// Header stamped on the chat notice, also the dedup key.
    pub header: String,
    /// Hours before a stale notice escalates.
    pub timeout_hours: f64,
    /// Log decisions without posting or messaging.
    pub dry_run: bool,
}

/// Fetch the transcript, slice out the most recently completed quest,
/// classify it, and post the award report unless one is already up.
pub fn run_quest_report(
    api: &dyn PartyApi,
    config: &QuestConfig,
    opts: &ReportOptions,
) -> Result<()> {
    let group_id = &config.party.group_id;
    let transcript = api.fetch_group_chat(group_id)?;

    let window = match extract_window(&transcript, config.report.history) {
        Ok(window) => window,
        Err(err) if err.is_not_found() => {
            info!(%err, "no quest data available; nothing to report");
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let records = classify_all(&window.messages);
    if !report_needed(&transcript, &records, &config.report.header) {
        info!("report already posted for this quest cycle; skipping");
        return Ok(());
    }

    let lines = format_report(&window, &records, &config.report.header);
    let body = to_chat_markdown(&lines);

    if opts.dry_run {
        println!("{}", body);
        return Ok(());
    }

    api.post_chat_message(group_id, &body)?;
    info!(group = %group_id, "posted quest report");

    if opts.post_to_secondary {
        match &config.party.secondary_group_id {
            Some(secondary) => {
                api.post_chat_message(secondary, &body)?;
                info!(group = %secondary, "mirrored quest report");
            }
            None => warn!("--secondary requested but no secondary_group_id configured"),
        }
    }

    if opts.queue_reminder {
        post_queue_reminder(api, config)?;
    }

    Ok(())
}

/// Pop the next scheduled quest starter and remind them in chat. The
/// entry is consumed even though the reminder is best-effort text; the
/// queue file is rewritten wholesale.
fn post_queue_reminder(api: &dyn PartyApi, config: &QuestConfig) -> Result<()> {
    let mut queue = QuestQueue::load(&config.paths.queue_file)?;
    let Some(entry) = queue.pop_front() else {
        debug!("quest queue empty; no reminder to post");
        return Ok(());
    };

    let reminder = format!(
        "Next up: `{}`, please send out invites for {}!",
        entry.user, entry.quest
    );
    api.post_chat_message(&config.party.group_id, &reminder)?;
    queue.save()?;
    info!(user = %entry.user, quest = %entry.quest, "posted queue reminder");
    Ok(())
}

/// Check for an invited-but-unstarted quest and walk the escalation
/// ladder: chat notice, then force-start after the timer, then private
/// messages to the quest leader and party leader when the start fails.
pub fn run_pending_notice(
    api: &dyn PartyApi,
    config: &QuestConfig,
    opts: &PendingOptions,
) -> Result<()> {
    let group_id = &config.party.group_id;
    let group = api.fetch_group_info(group_id)?;

    match quest_state(&group) {
        QuestState::Pending => {}
        state => {
            debug!(?state, "no pending quest; nothing to do");
            return Ok(());
        }
    }

    let quest_key = group.quest.key.as_deref().unwrap_or("unknown");
    let transcript = api.fetch_group_chat(group_id)?;
    let completed = last_completion_ts(&transcript);
    let notice = latest_notice_ts(&transcript, &opts.header, completed);

    match pending_step(notice, now_ms(), opts.timeout_hours) {
        PendingStep::Noop => {
            debug!("pending notice still fresh; waiting");
            Ok(())
        }
        PendingStep::PostNotice => {
            let leader = match group.quest.leader {
                Some(id) => api.fetch_member_name(id)?,
                None => "the quest owner".to_string(),
            };
            let notice_text = format!(
                "{}: invites are out for {} but the quest has not started. {}, please hit Begin!",
                opts.header, quest_key, leader
            );
            if opts.dry_run {
                println!("{}", notice_text);
                return Ok(());
            }
            api.post_chat_message(group_id, &notice_text)?;
            info!(quest = %quest_key, "posted pending-quest notice");
            Ok(())
        }
        PendingStep::AttemptStart => {
            if opts.dry_run {
                println!("would force-start quest {}", quest_key);
                return Ok(());
            }
            match api.force_start_quest(group_id) {
                Ok(()) => {
                    info!(quest = %quest_key, "force-started pending quest");
                    Ok(())
                }
                // routine: insufficient privilege or already in progress
                Err(err) => {
                    debug!(%err, "force start failed; escalating privately");
                    escalate(api, &group, quest_key, opts, notice)
                }
            }
        }
    }
}

fn escalate(
    api: &dyn PartyApi,
    group: &crate::chat::GroupInfo,
    quest_key: &str,
    opts: &PendingOptions,
    notice_ts: Option<i64>,
) -> Result<()> {
    let text = format!(
        "Quest {} has been pending for over {} hours. Please start it, or cancel the invite so the party can move on.",
        quest_key, opts.timeout_hours
    );

    let notice_ts = notice_ts.unwrap_or(0);
    let inbox = api.fetch_inbox()?;
    if escalation_already_sent(&inbox, &text, notice_ts) {
        info!("escalation already sent since the notice; skipping");
        return Ok(());
    }

    let mut recipients = Vec::new();
    if let Some(quest_leader) = group.quest.leader {
        recipients.push(quest_leader);
    }
    if !recipients.contains(&group.leader.id) {
        recipients.push(group.leader.id);
    }

    for user_id in recipients {
        api.post_private_message(user_id, &text)?;
    }
    info!(quest = %quest_key, "sent private escalation to quest and party leaders");
    Ok(())
}
