//! View model for the header detail popup.
//!
//! The popup itself is plain DOM glue. This module holds the parts with rules
//! in them: which replies count as "no data", header ordering, the copy text
//! for a row, and the follow-up badge refresh the popup sends after drawing.

use serde_json::{json, Value};
use status_badge_protocol::{Reply, TabId, TabRecord};

use crate::presenter::StatusClass;

pub const UNAVAILABLE_MESSAGE: &str = "No data available. Try refreshing the page.";
pub const NO_HEADERS_MESSAGE: &str = "No headers available";
const DEFAULT_METHOD: &str = "GET";
const DEFAULT_HTTP_VERSION: &str = "HTTP/1.1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow {
    pub name: String,
    pub value: String,
}

impl HeaderRow {
    /// Clipboard text for a clicked row.
    pub fn copy_text(&self) -> String {
        format!("{}: {}", self.name, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDetail {
    pub request_line: String,
    pub status_line: String,
    pub status_code: u16,
    pub status_class: StatusClass,
    pub rows: Vec<HeaderRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum DetailView {
    Loaded(LoadedDetail),
    /// Shown with a retry affordance.
    Unavailable { message: String },
}

impl DetailView {
    /// Builds the view from a `getHeaderData` reply. A missing reply (the
    /// channel closed without answering) is passed as `None`.
    pub fn from_reply(reply: Option<&Reply>) -> Self {
        match reply {
            Some(Reply {
                success: true,
                data: Some(record),
                ..
            }) if !record.url.is_empty() => DetailView::Loaded(LoadedDetail::from_record(record)),
            _ => DetailView::unavailable(),
        }
    }

    pub fn unavailable() -> Self {
        DetailView::Unavailable {
            message: UNAVAILABLE_MESSAGE.to_string(),
        }
    }

    /// `updateBadge` message the popup sends once data is on screen, so a
    /// badge draw missed by the background is repaired.
    pub fn badge_refresh(&self, active_tab: TabId) -> Option<Value> {
        match self {
            DetailView::Loaded(detail) => Some(json!({
                "action": "updateBadge",
                "tabId": active_tab.get(),
                "statusCode": detail.status_code,
            })),
            DetailView::Unavailable { .. } => None,
        }
    }
}

impl LoadedDetail {
    pub fn from_record(record: &TabRecord) -> Self {
        // BTreeMap iteration is already sorted by header name.
        let mut rows: Vec<HeaderRow> = record
            .response_headers
            .iter()
            .map(|(name, value)| HeaderRow {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();

        if rows.is_empty() {
            rows.push(HeaderRow {
                name: String::new(),
                value: NO_HEADERS_MESSAGE.to_string(),
            });
        }

        Self {
            request_line: format!("{} : {}", DEFAULT_METHOD, record.url),
            status_line: format!("{} {}", DEFAULT_HTTP_VERSION, record.status_code),
            status_code: record.status_code,
            status_class: StatusClass::from_code(record.status_code),
            rows,
        }
    }
}
