//! Message types exchanged between the status badge engine and its browser host.
//!
//! This crate is shared by the engine and the host process so both sides agree
//! on the schema. Inbound traffic is a stream of [`HostSignal`]s (platform
//! events plus message-channel requests); outbound traffic is a stream of
//! [`HostCommand`]s (badge mutations, active-tab queries, replies).
//!
//! Field names follow the browser's own camelCase payloads so the extension
//! shim can forward event details without reshaping them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub const PROTOCOL_VERSION: u32 = 1;
/// Largest single message the browser accepts from a native host.
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024; // 1MB

/// Raw tab identifier the platform uses for requests not tied to any tab.
pub const NO_TAB: i64 = -1;

// ═══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════════════

/// Browser tab handle. Unique among open tabs; reused after a tab closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(u32);

impl TabId {
    /// Converts a raw platform identifier, rejecting the "no tab" sentinel and
    /// anything else that is not a positive integer.
    pub fn from_raw(raw: i64) -> Option<Self> {
        if raw <= 0 {
            return None;
        }
        u32::try_from(raw).ok().map(TabId)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Inbound: platform signals
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    MainFrame,
    SubFrame,
    Stylesheet,
    Script,
    Image,
    Font,
    Object,
    #[serde(rename = "xmlhttprequest")]
    XmlHttpRequest,
    Ping,
    CspReport,
    Media,
    Websocket,
    Webbundle,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeader {
    pub name: String,
    /// Absent for headers the platform only exposes as binary values.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDetails {
    pub tab_id: i64,
    pub url: String,
    pub status_code: u16,
    #[serde(default)]
    pub status_line: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub response_headers: Option<Vec<HttpHeader>>,
    #[serde(default)]
    pub frame_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDetails {
    pub tab_id: i64,
    pub frame_id: i64,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInfo {
    pub tab_id: i64,
    #[serde(default)]
    pub window_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabChangeInfo {
    #[serde(default)]
    pub status: Option<String>,
}

impl TabChangeInfo {
    pub fn is_complete(&self) -> bool {
        self.status.as_deref() == Some("complete")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabUpdate {
    pub tab_id: i64,
    #[serde(default)]
    pub change_info: TabChangeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRemoval {
    pub tab_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingMessage {
    pub request_id: u64,
    /// Kept as raw JSON so unknown actions can be ignored without failing
    /// the whole signal.
    pub message: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTabResolution {
    pub query_id: u64,
    #[serde(default)]
    pub tab_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BadgeCall {
    SetBadgeText,
    SetBadgeBackgroundColor,
    SetBadgeTextColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeCallFailure {
    pub tab_id: i64,
    pub call: BadgeCall,
    #[serde(default)]
    pub error: String,
}

/// Everything the host can tell the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "camelCase")]
pub enum HostSignal {
    /// Extension installed, updated or reloaded.
    Installed,
    ResponseReceived(ResponseDetails),
    NavigationCompleted(NavigationDetails),
    TabActivated(ActiveInfo),
    TabUpdated(TabUpdate),
    TabRemoved(TabRemoval),
    Message(IncomingMessage),
    ActiveTabResolved(ActiveTabResolution),
    BadgeCallFailed(BadgeCallFailure),
}

pub fn parse_signal(value: Value) -> Result<HostSignal, serde_json::Error> {
    serde_json::from_value(value)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Message channel
// ═══════════════════════════════════════════════════════════════════════════════

/// Requests carried over the extension's runtime message channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Message {
    GetHeaderData,
    UpdateBadge {
        #[serde(rename = "tabId", default)]
        tab_id: Option<i64>,
        #[serde(rename = "statusCode", default)]
        status_code: Option<i64>,
    },
    PageLoaded {
        #[serde(default)]
        url: String,
    },
    GetCurrentUrl,
}

impl Message {
    /// Returns `None` for payloads with an unrecognized or missing action.
    pub fn parse(value: &Value) -> Option<Self> {
        Message::deserialize(value).ok()
    }
}

/// Latest known response metadata for one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub url: String,
    pub status_code: u16,
    pub status_text: String,
    pub response_headers: BTreeMap<String, String>,
    pub request_type: ResourceType,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TabRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn with_data(record: TabRecord) -> Self {
        Self {
            success: true,
            data: Some(record),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Reply the content collaborator sends for [`Message::GetCurrentUrl`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUrlReply {
    pub url: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Outbound: host commands
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostCommand {
    SetBadgeText {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        text: String,
    },
    SetBadgeBackgroundColor {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        color: String,
    },
    SetBadgeTextColor {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        color: String,
    },
    /// Ask the host which tab is focused in the current window.
    QueryActiveTab {
        #[serde(rename = "queryId")]
        query_id: u64,
    },
    Reply {
        #[serde(rename = "requestId")]
        request_id: u64,
        reply: Reply,
    },
}

impl HostCommand {
    pub fn badge_call(&self) -> Option<BadgeCall> {
        match self {
            HostCommand::SetBadgeText { .. } => Some(BadgeCall::SetBadgeText),
            HostCommand::SetBadgeBackgroundColor { .. } => Some(BadgeCall::SetBadgeBackgroundColor),
            HostCommand::SetBadgeTextColor { .. } => Some(BadgeCall::SetBadgeTextColor),
            HostCommand::QueryActiveTab { .. } | HostCommand::Reply { .. } => None,
        }
    }
}
