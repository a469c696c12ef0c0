//! # status-badge-core
//!
//! Tracks the HTTP status of the top-level navigation in each browser tab and
//! decides what the extension icon badge should show.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. The host performs every
//!   platform call; handlers only return [`HostCommand`]s describing them.
//! - **Single writer**: Only the response observer writes tab records. The
//!   reconciler and the query gateway read.
//! - **Re-derive, don't assume**: Badges are transient UI state. Every focus or
//!   lifecycle transition redraws from the stored record.
//! - **Failures stop at the boundary**: Nothing a handler does can fail the
//!   host's event loop. Badge call failures are logged and dropped.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use status_badge_core::BadgeEngine;
//!
//! let mut engine = BadgeEngine::default();
//! for command in engine.handle(signal) {
//!     host.perform(command);
//! }
//! ```

pub mod detail;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod observer;
pub mod presenter;
pub mod reconciler;
pub mod store;

pub use detail::{DetailView, HeaderRow, LoadedDetail};
pub use engine::BadgeEngine;
pub use error::QueryError;
pub use presenter::{BadgePalette, BadgeRender, StatusClass};
pub use status_badge_protocol::{HostCommand, HostSignal, Reply, TabId, TabRecord};
pub use store::TabStateStore;
