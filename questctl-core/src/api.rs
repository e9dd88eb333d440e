//! The seam between the core pipeline and the remote party service.
//!
//! The core never talks to the network itself; everything goes through
//! this trait so scheduled runs can be driven against the real HTTP
//! client in questctl-cli or an in-memory fake in tests. Calls are
//! synchronous request/response with no retry logic here (spec of the
//! HTTP collaborator).

use uuid::Uuid;

use crate::chat::{ChatMessage, GroupInfo, InboxMessage};
use crate::error::Result;

pub trait PartyApi {
    /// Full chat transcript for a group, in the service's order
    /// (newest-first).
    fn fetch_group_chat(&self, group_id: &str) -> Result<Vec<ChatMessage>>;

    /// Group/party data including quest status and leader.
    fn fetch_group_info(&self, group_id: &str) -> Result<GroupInfo>;

    /// The account's own private inbox, used for escalation dedup.
    fn fetch_inbox(&self) -> Result<Vec<InboxMessage>>;

    /// Display name for a user id, for naming the quest leader in notices.
    fn fetch_member_name(&self, user_id: Uuid) -> Result<String>;

    fn post_chat_message(&self, group_id: &str, text: &str) -> Result<()>;

    fn post_private_message(&self, user_id: Uuid, text: &str) -> Result<()>;

    /// Privileged force-start. Failure here is routine (insufficient
    /// privilege, already started) and feeds the escalation path.
    fn force_start_quest(&self, group_id: &str) -> Result<()>;
}
