//! Badge rendering.
//!
//! Maps a status code to the three badge calls the host performs for a tab.
//! Output depends only on the input, so repeating a draw is harmless and a
//! later draw for the same tab fully supersedes an earlier one.

use serde::{Deserialize, Serialize};
use status_badge_protocol::{HostCommand, TabId};

pub const DEFAULT_SUCCESS_COLOR: &str = "#22c55e";
pub const DEFAULT_REDIRECT_COLOR: &str = "#f97316";
pub const DEFAULT_ERROR_COLOR: &str = "#c30b0b";
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";

/// Badge colors. Loaded from the `[badge]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgePalette {
    pub success_color: String,
    pub redirect_color: String,
    pub error_color: String,
    pub text_color: String,
}

impl Default for BadgePalette {
    fn default() -> Self {
        Self {
            success_color: DEFAULT_SUCCESS_COLOR.to_string(),
            redirect_color: DEFAULT_REDIRECT_COLOR.to_string(),
            error_color: DEFAULT_ERROR_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
        }
    }
}

impl BadgePalette {
    pub fn background_for(&self, class: StatusClass) -> &str {
        match class {
            StatusClass::Success => &self.success_color,
            StatusClass::Redirect => &self.redirect_color,
            StatusClass::Informational | StatusClass::Error => &self.error_color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Below 200. Badged like an error.
    Informational,
    Success,
    Redirect,
    Error,
}

impl StatusClass {
    pub fn from_code(status_code: u16) -> Self {
        match status_code {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirect,
            0..=199 => StatusClass::Informational,
            _ => StatusClass::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeRender {
    /// Plain 200: no badge text, colors left alone.
    Cleared,
    Shown {
        text: String,
        background: String,
        text_color: String,
    },
}

pub fn render(status_code: u16, palette: &BadgePalette) -> BadgeRender {
    if status_code == 200 {
        return BadgeRender::Cleared;
    }

    let class = StatusClass::from_code(status_code);
    BadgeRender::Shown {
        text: status_code.to_string(),
        background: palette.background_for(class).to_string(),
        text_color: palette.text_color.clone(),
    }
}

impl BadgeRender {
    /// Host calls for this render, text first. Each call is independent: the
    /// host reports a failed call without skipping the others.
    pub fn into_commands(self, tab_id: TabId) -> Vec<HostCommand> {
        match self {
            BadgeRender::Cleared => clear_commands(tab_id),
            BadgeRender::Shown {
                text,
                background,
                text_color,
            } => vec![
                HostCommand::SetBadgeText { tab_id, text },
                HostCommand::SetBadgeBackgroundColor {
                    tab_id,
                    color: background,
                },
                HostCommand::SetBadgeTextColor {
                    tab_id,
                    color: text_color,
                },
            ],
        }
    }
}

pub fn badge_commands(tab_id: TabId, status_code: u16, palette: &BadgePalette) -> Vec<HostCommand> {
    tracing::debug!(tab_id = %tab_id, status_code, "Updating badge");
    render(status_code, palette).into_commands(tab_id)
}

pub fn clear_commands(tab_id: TabId) -> Vec<HostCommand> {
    vec![HostCommand::SetBadgeText {
        tab_id,
        text: String::new(),
    }]
}
