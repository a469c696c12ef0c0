//! Badge reconciliation on tab lifecycle changes.
//!
//! The platform may reset a badge whenever it likes, so every navigation,
//! activation and load-complete redraws from the stored record. None of these
//! paths write tab records; tab removal only forgets one.

use status_badge_protocol::{ActiveInfo, HostCommand, NavigationDetails, TabId, TabRemoval, TabUpdate};

use crate::presenter::{badge_commands, clear_commands, BadgePalette};
use crate::store::TabStateStore;

const TOP_LEVEL_FRAME: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconcile {
    Redraw { tab_id: TabId, status_code: u16 },
    Clear { tab_id: TabId },
    Forget { tab_id: TabId },
    Skip,
}

pub fn reconcile_navigation(details: &NavigationDetails, store: &TabStateStore) -> Reconcile {
    if details.frame_id != TOP_LEVEL_FRAME {
        return Reconcile::Skip;
    }
    match TabId::from_raw(details.tab_id) {
        Some(tab_id) => redraw_if_known(tab_id, store),
        None => Reconcile::Skip,
    }
}

pub fn reconcile_activation(info: &ActiveInfo, store: &TabStateStore) -> Reconcile {
    let tab_id = match TabId::from_raw(info.tab_id) {
        Some(tab_id) => tab_id,
        None => return Reconcile::Skip,
    };
    match store.status_for(tab_id) {
        Some(status_code) => Reconcile::Redraw {
            tab_id,
            status_code,
        },
        // Never-observed tabs (new-tab pages, internal URLs) get a blank badge.
        None => Reconcile::Clear { tab_id },
    }
}

pub fn reconcile_update(update: &TabUpdate, store: &TabStateStore) -> Reconcile {
    if !update.change_info.is_complete() {
        return Reconcile::Skip;
    }
    match TabId::from_raw(update.tab_id) {
        Some(tab_id) => redraw_if_known(tab_id, store),
        None => Reconcile::Skip,
    }
}

pub fn reconcile_removal(removal: &TabRemoval) -> Reconcile {
    match TabId::from_raw(removal.tab_id) {
        Some(tab_id) => Reconcile::Forget { tab_id },
        None => Reconcile::Skip,
    }
}

fn redraw_if_known(tab_id: TabId, store: &TabStateStore) -> Reconcile {
    match store.status_for(tab_id) {
        Some(status_code) => Reconcile::Redraw {
            tab_id,
            status_code,
        },
        None => Reconcile::Skip,
    }
}

impl Reconcile {
    /// Carries out the decision. `Forget` is the only variant that touches the
    /// store, and no badge call follows it since the tab is gone.
    pub fn apply(self, store: &mut TabStateStore, palette: &BadgePalette) -> Vec<HostCommand> {
        match self {
            Reconcile::Redraw {
                tab_id,
                status_code,
            } => {
                tracing::debug!(tab_id = %tab_id, status_code, "Reasserting badge from stored status");
                badge_commands(tab_id, status_code, palette)
            }
            Reconcile::Clear { tab_id } => {
                tracing::debug!(tab_id = %tab_id, "No stored status; clearing badge");
                clear_commands(tab_id)
            }
            Reconcile::Forget { tab_id } => {
                if store.remove(tab_id).is_some() {
                    tracing::debug!(tab_id = %tab_id, "Tab closed; record dropped");
                }
                Vec::new()
            }
            Reconcile::Skip => Vec::new(),
        }
    }
}
