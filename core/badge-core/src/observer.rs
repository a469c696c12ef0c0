//! Response observation.
//!
//! Turns raw response-received details into tab records. This is the only
//! writer of [`TabStateStore`]. Filtering runs in order and any failed check
//! drops the event without touching the store or the badge:
//!
//! 1. The response must belong to a tab.
//! 2. The resource must be the top-level document.
//! 3. The status code must be a real HTTP status (100..=599).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use status_badge_protocol::{
    HostCommand, HttpHeader, ResourceType, ResponseDetails, TabId, TabRecord,
};

use crate::presenter::{badge_commands, BadgePalette};
use crate::store::TabStateStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoTab,
    NotTopLevel(ResourceType),
    StatusOutOfRange(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum ResponseUpdate {
    Record { tab_id: TabId, record: TabRecord },
    Skip(SkipReason),
}

pub fn reduce_response(details: &ResponseDetails, now: DateTime<Utc>) -> ResponseUpdate {
    let tab_id = match TabId::from_raw(details.tab_id) {
        Some(tab_id) => tab_id,
        None => return ResponseUpdate::Skip(SkipReason::NoTab),
    };

    if details.resource_type != ResourceType::MainFrame {
        return ResponseUpdate::Skip(SkipReason::NotTopLevel(details.resource_type));
    }

    if !(100..=599).contains(&details.status_code) {
        return ResponseUpdate::Skip(SkipReason::StatusOutOfRange(details.status_code));
    }

    let record = TabRecord {
        url: details.url.clone(),
        status_code: details.status_code,
        status_text: status_text(&details.status_line, details.status_code),
        response_headers: collect_headers(details.response_headers.as_deref().unwrap_or_default()),
        request_type: ResourceType::MainFrame,
        last_updated: now,
    };

    ResponseUpdate::Record { tab_id, record }
}

/// Applies a response event: store write, then badge draw.
pub fn handle_response(
    store: &mut TabStateStore,
    details: &ResponseDetails,
    palette: &BadgePalette,
) -> Vec<HostCommand> {
    match reduce_response(details, Utc::now()) {
        ResponseUpdate::Record { tab_id, record } => {
            let status_code = record.status_code;
            tracing::info!(
                tab_id = %tab_id,
                status_code,
                url = %record.url,
                headers = record.response_headers.len(),
                "Top-level response recorded"
            );
            store.put(tab_id, record);
            badge_commands(tab_id, status_code, palette)
        }
        ResponseUpdate::Skip(reason) => {
            tracing::debug!(
                tab_id = details.tab_id,
                url = %details.url,
                reason = ?reason,
                "Response ignored"
            );
            Vec::new()
        }
    }
}

/// Header list to name→value map. Names keep their received case; the last
/// occurrence of a repeated name wins.
pub fn collect_headers(headers: &[HttpHeader]) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|header| {
            (
                header.name.clone(),
                header.value.clone().unwrap_or_default(),
            )
        })
        .collect()
}

/// Reason phrase from a raw status line.
///
/// Drops the protocol token and, when it matches, the numeric code:
/// `"HTTP/1.1 404 Not Found"` gives `"Not Found"`.
pub fn status_text(status_line: &str, status_code: u16) -> String {
    let mut tokens = status_line.split_whitespace().skip(1).peekable();
    if tokens
        .peek()
        .is_some_and(|token| token.parse::<u16>().ok() == Some(status_code))
    {
        tokens.next();
    }
    tokens.collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use status_badge_protocol::NO_TAB;

    fn header(name: &str, value: &str) -> HttpHeader {
        HttpHeader {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }

    fn details(tab_id: i64, status_code: u16, status_line: &str) -> ResponseDetails {
        ResponseDetails {
            tab_id,
            url: "https://example.com/missing".to_string(),
            status_code,
            status_line: status_line.to_string(),
            resource_type: ResourceType::MainFrame,
            response_headers: Some(vec![
                header("Content-Type", "text/html"),
                header("Set-Cookie", "a=1"),
                header("Set-Cookie", "b=2"),
            ]),
            frame_id: Some(0),
        }
    }

    fn tab(raw: i64) -> TabId {
        TabId::from_raw(raw).expect("valid tab id")
    }

    #[test]
    fn status_text_strips_protocol_and_code() {
        assert_eq!(status_text("HTTP/1.1 404 Not Found", 404), "Not Found");
        assert_eq!(status_text("HTTP/1.1 200 OK", 200), "OK");
        assert_eq!(status_text("HTTP/2 200", 200), "");
        assert_eq!(status_text("", 200), "");
    }

    #[test]
    fn status_text_keeps_unmatched_second_token() {
        assert_eq!(status_text("HTTP/1.1 Moved Permanently", 301), "Moved Permanently");
    }

    #[test]
    fn duplicate_headers_keep_last_value() {
        let headers = collect_headers(&[
            header("Set-Cookie", "a=1"),
            header("set-cookie", "lower"),
            header("Set-Cookie", "b=2"),
        ]);
        assert_eq!(headers.get("Set-Cookie").map(String::as_str), Some("b=2"));
        assert_eq!(headers.get("set-cookie").map(String::as_str), Some("lower"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn binary_header_stored_as_empty() {
        let headers = collect_headers(&[HttpHeader {
            name: "X-Bin".to_string(),
            value: None,
        }]);
        assert_eq!(headers.get("X-Bin").map(String::as_str), Some(""));
    }

    #[test]
    fn reduce_builds_record_for_top_level_response() {
        let now = Utc::now();
        match reduce_response(&details(7, 404, "HTTP/1.1 404 Not Found"), now) {
            ResponseUpdate::Record { tab_id, record } => {
                assert_eq!(tab_id, tab(7));
                assert_eq!(record.status_code, 404);
                assert_eq!(record.status_text, "Not Found");
                assert_eq!(record.request_type, ResourceType::MainFrame);
                assert_eq!(record.last_updated, now);
                assert_eq!(
                    record.response_headers.get("Set-Cookie").map(String::as_str),
                    Some("b=2")
                );
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn reduce_skips_tabless_requests() {
        let update = reduce_response(&details(NO_TAB, 200, "HTTP/1.1 200 OK"), Utc::now());
        assert_eq!(update, ResponseUpdate::Skip(SkipReason::NoTab));
    }

    #[test]
    fn reduce_skips_sub_resources() {
        let mut image = details(7, 200, "HTTP/1.1 200 OK");
        image.resource_type = ResourceType::Image;
        assert_eq!(
            reduce_response(&image, Utc::now()),
            ResponseUpdate::Skip(SkipReason::NotTopLevel(ResourceType::Image))
        );
    }

    #[test]
    fn reduce_skips_impossible_status() {
        assert_eq!(
            reduce_response(&details(7, 0, ""), Utc::now()),
            ResponseUpdate::Skip(SkipReason::StatusOutOfRange(0))
        );
        assert_eq!(
            reduce_response(&details(7, 600, ""), Utc::now()),
            ResponseUpdate::Skip(SkipReason::StatusOutOfRange(600))
        );
    }

    #[test]
    fn handle_writes_store_and_draws_badge() {
        let mut store = TabStateStore::new();
        let commands = handle_response(
            &mut store,
            &details(7, 404, "HTTP/1.1 404 Not Found"),
            &BadgePalette::default(),
        );

        assert_eq!(store.status_for(tab(7)), Some(404));
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[0],
            HostCommand::SetBadgeText {
                tab_id: tab(7),
                text: "404".to_string()
            }
        );
    }

    #[test]
    fn handle_sub_resource_leaves_everything_alone() {
        let mut store = TabStateStore::new();
        handle_response(
            &mut store,
            &details(7, 404, "HTTP/1.1 404 Not Found"),
            &BadgePalette::default(),
        );

        let mut image = details(7, 500, "HTTP/1.1 500 Internal Server Error");
        image.resource_type = ResourceType::Image;
        let commands = handle_response(&mut store, &image, &BadgePalette::default());

        assert!(commands.is_empty());
        assert_eq!(store.status_for(tab(7)), Some(404));
    }
}
