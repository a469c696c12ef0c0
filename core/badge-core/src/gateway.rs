//! Message-channel requests from the detail view.
//!
//! `getHeaderData` cannot be answered until the host says which tab is
//! focused, so it is split in two: [`handle_message`] returns
//! [`GatewayOutcome::AwaitActiveTab`], and the answer is built later by
//! [`current_state_reply`] once the tab is resolved. `updateBadge` is answered
//! on the spot. Anything else gets no reply so other listeners on the same
//! channel are not disturbed.

use serde_json::Value;
use status_badge_protocol::{Message, Reply, TabId, TabRecord};

use crate::error::QueryError;
use crate::store::TabStateStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// Reply now. A requested badge redraw is issued before the reply.
    Immediate {
        reply: Reply,
        redraw: Option<(TabId, u16)>,
    },
    AwaitActiveTab,
    Ignored,
}

pub fn handle_message(message: &Value) -> GatewayOutcome {
    match Message::parse(message) {
        Some(Message::GetHeaderData) => GatewayOutcome::AwaitActiveTab,
        Some(Message::UpdateBadge {
            tab_id,
            status_code,
        }) => match parse_badge_target(tab_id, status_code) {
            Some(target) => GatewayOutcome::Immediate {
                reply: Reply::ok(),
                redraw: Some(target),
            },
            None => {
                tracing::debug!(?tab_id, ?status_code, "updateBadge without usable target");
                GatewayOutcome::Ignored
            }
        },
        Some(Message::PageLoaded { url }) => {
            tracing::debug!(url = %url, "Page loaded");
            GatewayOutcome::Ignored
        }
        // Answered by the content collaborator, not by us.
        Some(Message::GetCurrentUrl) => GatewayOutcome::Ignored,
        None => {
            tracing::debug!(message = %message, "Ignoring unrecognized message");
            GatewayOutcome::Ignored
        }
    }
}

fn parse_badge_target(tab_id: Option<i64>, status_code: Option<i64>) -> Option<(TabId, u16)> {
    let tab_id = TabId::from_raw(tab_id?)?;
    let status_code = u16::try_from(status_code?).ok().filter(|code| *code != 0)?;
    Some((tab_id, status_code))
}

pub fn resolve_current_state(
    active: Option<TabId>,
    store: &TabStateStore,
) -> Result<&TabRecord, QueryError> {
    let tab_id = active.ok_or(QueryError::NoActiveTab)?;
    store
        .get(tab_id)
        .filter(|record| record.status_code != 0)
        .ok_or(QueryError::NoDataForTab)
}

pub fn current_state_reply(active: Option<TabId>, store: &TabStateStore) -> Reply {
    match resolve_current_state(active, store) {
        Ok(record) => {
            tracing::debug!(
                tab_id = ?active,
                status_code = record.status_code,
                "Sending header data"
            );
            Reply::with_data(record.clone())
        }
        Err(err) => {
            tracing::debug!(tab_id = ?active, error = %err, "No header data to send");
            Reply::error(err.to_string())
        }
    }
}
