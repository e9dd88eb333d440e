pub mod api;
pub mod awards;
pub mod chat;
pub mod classify;
pub mod config;
pub mod error;
pub mod escalation;
pub mod gate;
pub mod queue;
pub mod report;
pub mod run;
pub mod time;
pub mod window;

pub use api::PartyApi;
pub use awards::{top_users, AwardResult};
pub use chat::{ChatMessage, GroupInfo, InboxMessage, QuestStatus};
pub use classify::{classify, classify_all, ActionRecord, Verb};
pub use config::QuestConfig;
pub use error::{QuestError, Result};
pub use gate::report_needed;
pub use queue::{QueueEntry, QuestQueue};
pub use report::{format_report, to_chat_markdown};
pub use run::{run_pending_notice, run_quest_report, PendingOptions, ReportOptions};
pub use window::{extract_window, QuestWindow};
