//! Error types for state queries.
//!
//! The Display strings double as the `error` text of failed replies, so the
//! detail view can show them without translation.

/// Reasons a `getHeaderData` request cannot be answered with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("No active tab")]
    NoActiveTab,

    #[error("No header data for this tab. Try refreshing the page.")]
    NoDataForTab,
}
