//! Host configuration.
//!
//! Read from `~/.status-badge/config.toml` unless overridden by `--config` or
//! `STATUS_BADGE_CONFIG`. A missing file means defaults.
//!
//! ```toml
//! [badge]
//! success_color = "#22c55e"
//! redirect_color = "#f97316"
//! error_color = "#c30b0b"
//! text_color = "#FFFFFF"
//! ```

use serde::{Deserialize, Serialize};
use status_badge_core::BadgePalette;
use std::env;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "STATUS_BADGE_CONFIG";
const CONFIG_RELATIVE_PATH: &str = ".status-badge/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    #[serde(default)]
    pub badge: BadgePalette,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeNotFound,

    #[error("Failed to read config: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid color for badge.{field}: {value:?} (expected #RGB or #RRGGBB)")]
    InvalidColor { field: &'static str, value: String },
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    Ok(home.join(CONFIG_RELATIVE_PATH))
}

/// Explicit path first, then the environment, then the default location.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    match env::var_os(CONFIG_ENV) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => default_config_path(),
    }
}

pub fn load_config(path: &Path) -> Result<HostConfig, ConfigError> {
    if !path.exists() {
        return Ok(HostConfig::default());
    }

    let content = fs_err::read_to_string(path).map_err(ConfigError::Read)?;
    let config: HostConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &HostConfig) -> Result<(), ConfigError> {
    let palette = &config.badge;
    for (field, value) in [
        ("success_color", &palette.success_color),
        ("redirect_color", &palette.redirect_color),
        ("error_color", &palette.error_color),
        ("text_color", &palette.text_color),
    ] {
        if !is_hex_color(value) {
            return Err(ConfigError::InvalidColor {
                field,
                value: value.clone(),
            });
        }
    }
    Ok(())
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
