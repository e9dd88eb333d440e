//! Blocking HTTP implementation of `PartyApi` against the v3 REST API.
//!
//! Thin glue only: every response is the service's `{success, data}`
//! envelope, every failure maps to `QuestError::Remote`. No retry or
//! backoff; a transient failure surfaces immediately to the caller.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use questctl_core::api::PartyApi;
use questctl_core::chat::{ChatMessage, GroupInfo, InboxMessage};
use questctl_core::config::QuestConfig;
use questctl_core::error::{QuestError, Result};

const CLIENT_ID: &str = "questctl";

pub struct HabiticaClient {
    http: Client,
    base_url: String,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct MemberData {
    profile: MemberProfile,
}

#[derive(Deserialize)]
struct MemberProfile {
    name: String,
}

impl HabiticaClient {
    pub fn new(config: &QuestConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-user",
            HeaderValue::from_str(&config.credentials.user_id.to_string())
                .map_err(|e| QuestError::config(format!("bad user id header: {}", e)))?,
        );
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&config.credentials.api_token)
                .map_err(|e| QuestError::config(format!("bad api token header: {}", e)))?,
        );
        headers.insert("x-client", HeaderValue::from_static(CLIENT_ID));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| QuestError::remote("build http client", e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn execute<T: DeserializeOwned>(&self, operation: &str, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .map_err(|e| QuestError::remote(operation, e.to_string()))?;

        let status = response.status();
        let envelope: Envelope<T> = response
            .json()
            .map_err(|e| QuestError::remote(operation, format!("bad response body: {}", e)))?;

        if !status.is_success() || !envelope.success {
            let reason = envelope
                .message
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(QuestError::remote(operation, reason));
        }

        envelope
            .data
            .ok_or_else(|| QuestError::remote(operation, "response missing data"))
    }

    fn execute_ack(&self, operation: &str, request: RequestBuilder) -> Result<()> {
        // same envelope, payload ignored
        let _: serde_json::Value = self.execute(operation, request)?;
        Ok(())
    }
}

impl PartyApi for HabiticaClient {
    fn fetch_group_chat(&self, group_id: &str) -> Result<Vec<ChatMessage>> {
        self.execute(
            "fetch group chat",
            self.http.get(self.url(&format!("/groups/{}/chat", group_id))),
        )
    }

    fn fetch_group_info(&self, group_id: &str) -> Result<GroupInfo> {
        self.execute(
            "fetch group info",
            self.http.get(self.url(&format!("/groups/{}", group_id))),
        )
    }

    fn fetch_inbox(&self) -> Result<Vec<InboxMessage>> {
        self.execute("fetch inbox", self.http.get(self.url("/inbox/messages")))
    }

    fn fetch_member_name(&self, user_id: Uuid) -> Result<String> {
        let member: MemberData = self.execute(
            "fetch member",
            self.http.get(self.url(&format!("/members/{}", user_id))),
        )?;
        Ok(member.profile.name)
    }

    fn post_chat_message(&self, group_id: &str, text: &str) -> Result<()> {
        self.execute_ack(
            "post chat message",
            self.http
                .post(self.url(&format!("/groups/{}/chat", group_id)))
                .json(&json!({ "message": text })),
        )
    }

    fn post_private_message(&self, user_id: Uuid, text: &str) -> Result<()> {
        self.execute_ack(
            "post private message",
            self.http
                .post(self.url("/members/send-private-message"))
                .json(&json!({ "toUserId": user_id, "message": text })),
        )
    }

    fn force_start_quest(&self, group_id: &str) -> Result<()> {
        self.execute_ack(
            "force start quest",
            self.http
                .post(self.url(&format!("/groups/{}/quests/force-start", group_id))),
        )
    }
}
