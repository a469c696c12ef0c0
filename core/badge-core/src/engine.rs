//! Signal dispatch.
//!
//! [`BadgeEngine`] owns the tab store and routes each [`HostSignal`] to the
//! component responsible for it, returning the host calls to perform in
//! order. Handlers run one at a time to completion; the only suspension point
//! is the active-tab lookup, tracked here as a pending query.

use std::collections::HashMap;

use status_badge_protocol::{
    BadgeCallFailure, HostCommand, HostSignal, IncomingMessage, TabId,
};

use crate::gateway::{current_state_reply, handle_message, GatewayOutcome};
use crate::observer::handle_response;
use crate::presenter::{badge_commands, BadgePalette};
use crate::reconciler::{
    reconcile_activation, reconcile_navigation, reconcile_removal, reconcile_update,
};
use crate::store::TabStateStore;

#[derive(Debug, Default)]
pub struct BadgeEngine {
    store: TabStateStore,
    palette: BadgePalette,
    /// Query id → message request id awaiting an active-tab answer.
    pending: HashMap<u64, u64>,
    next_query_id: u64,
}

impl BadgeEngine {
    pub fn new(palette: BadgePalette) -> Self {
        Self {
            palette,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &TabStateStore {
        &self.store
    }

    pub fn palette(&self) -> &BadgePalette {
        &self.palette
    }

    pub fn pending_queries(&self) -> usize {
        self.pending.len()
    }

    pub fn handle(&mut self, signal: HostSignal) -> Vec<HostCommand> {
        match signal {
            HostSignal::Installed => {
                tracing::info!(
                    tabs = self.store.len(),
                    pending = self.pending.len(),
                    "Extension installed; clearing tab state"
                );
                self.store.clear();
                self.pending.clear();
                Vec::new()
            }
            HostSignal::ResponseReceived(details) => {
                handle_response(&mut self.store, &details, &self.palette)
            }
            HostSignal::NavigationCompleted(details) => {
                reconcile_navigation(&details, &self.store).apply(&mut self.store, &self.palette)
            }
            HostSignal::TabActivated(info) => {
                tracing::debug!(tab_id = info.tab_id, "Tab activated");
                reconcile_activation(&info, &self.store).apply(&mut self.store, &self.palette)
            }
            HostSignal::TabUpdated(update) => {
                reconcile_update(&update, &self.store).apply(&mut self.store, &self.palette)
            }
            HostSignal::TabRemoved(removal) => {
                reconcile_removal(&removal).apply(&mut self.store, &self.palette)
            }
            HostSignal::Message(message) => self.dispatch_message(message),
            HostSignal::ActiveTabResolved(resolution) => {
                let request_id = match self.pending.remove(&resolution.query_id) {
                    Some(request_id) => request_id,
                    None => {
                        tracing::warn!(
                            query_id = resolution.query_id,
                            "Active tab resolved for unknown query"
                        );
                        return Vec::new();
                    }
                };
                let active = resolution.tab_id.and_then(TabId::from_raw);
                vec![HostCommand::Reply {
                    request_id,
                    reply: current_state_reply(active, &self.store),
                }]
            }
            HostSignal::BadgeCallFailed(failure) => {
                log_badge_failure(&failure);
                Vec::new()
            }
        }
    }

    fn dispatch_message(&mut self, message: IncomingMessage) -> Vec<HostCommand> {
        match handle_message(&message.message) {
            GatewayOutcome::Immediate { reply, redraw } => {
                let mut commands = match redraw {
                    Some((tab_id, status_code)) => {
                        badge_commands(tab_id, status_code, &self.palette)
                    }
                    None => Vec::new(),
                };
                commands.push(HostCommand::Reply {
                    request_id: message.request_id,
                    reply,
                });
                commands
            }
            GatewayOutcome::AwaitActiveTab => {
                let query_id = self.next_query_id;
                self.next_query_id = self.next_query_id.wrapping_add(1);
                self.pending.insert(query_id, message.request_id);
                vec![HostCommand::QueryActiveTab { query_id }]
            }
            GatewayOutcome::Ignored => Vec::new(),
        }
    }
}

fn log_badge_failure(failure: &BadgeCallFailure) {
    tracing::warn!(
        tab_id = failure.tab_id,
        call = ?failure.call,
        error = %failure.error,
        "Badge update failed"
    );
}
