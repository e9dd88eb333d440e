//! Wire data model for the remote party API.
//!
//! Field names follow the service's JSON: chat messages carry the display
//! name under `user`, group payloads use `_id` style identifiers in some
//! responses and `id` in others, so aliases are accepted on the way in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One transcript entry. Immutable once received; transcript order is
/// whatever the service returned (newest-first) and is not assumed
/// monotonic anywhere downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub text: String,
    /// Milliseconds since epoch.
    pub timestamp: i64,
    /// Display name of the author; absent for system messages.
    #[serde(rename = "user", default)]
    pub author: Option<String>,
}

impl ChatMessage {
    /// System message constructor, used heavily by tests.
    pub fn system(text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: None,
            text: text.into(),
            timestamp,
            author: None,
        }
    }
}

/// Quest block of a group payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestStatus {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub key: Option<String>,
    /// User id of whoever sent the quest invites.
    #[serde(default)]
    pub leader: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupLeader {
    #[serde(alias = "_id")]
    pub id: Uuid,
}

/// The slice of group/party data the core reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupInfo {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quest: QuestStatus,
    pub leader: GroupLeader,
}

/// One message from the account's own inbox, used for escalation dedup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxMessage {
    pub text: String,
    /// Milliseconds since epoch.
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_wire_format() {
        let json = r#"{"id":"9a2f1f7e-3a57-4c2e-8a30-111111111111",
                       "text":"`Alice` attacks Dragon for 10.0 damage.",
                       "timestamp":1700000000000,
                       "user":"Alice"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.author.as_deref(), Some("Alice"));
        assert_eq!(msg.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn test_system_message_has_no_author() {
        let json = r#"{"text":"Your quest has begun.","timestamp":1}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert!(msg.author.is_none());
    }

    #[test]
    fn test_group_info_id_alias() {
        let json = r#"{
            "_id": "party-id",
            "quest": {"active": false, "key": "basilist",
                      "leader": "9a2f1f7e-3a57-4c2e-8a30-111111111111"},
            "leader": {"_id": "9a2f1f7e-3a57-4c2e-8a30-222222222222"}
        }"#;
        let info: GroupInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.id, "party-id");
        assert!(!info.quest.active);
        assert_eq!(info.quest.key.as_deref(), Some("basilist"));
    }
}
