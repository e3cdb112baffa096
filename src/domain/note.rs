use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// A persisted note as presented to the UI.
///
/// Notes are immutable once created except for deletion. The `timestamp`
/// field is already display-formatted; the wire-level ISO-8601 value stays
/// inside the store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Opaque store-assigned identifier.
    pub id: String,
    pub content: String,
    /// Display-formatted creation time.
    pub timestamp: String,
}

/// A note about to be inserted; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNote {
    pub content: String,
    /// ISO-8601 creation time, generated client-side at save.
    pub timestamp: String,
}

impl NewNote {
    /// Build a new note stamped with the current time.
    pub fn now(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Format a wire-level ISO-8601 timestamp for display.
/// Unparseable values are passed through unchanged rather than dropped.
#[must_use]
pub fn format_timestamp(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Join transferred response text onto an existing draft.
/// An empty draft takes the text as-is; otherwise a blank line separates
/// the old draft from the appended text.
#[must_use]
pub fn append_to_draft(draft: &str, text: &str) -> String {
    if draft.is_empty() {
        text.to_string()
    } else {
        format!("{draft}\n\n{text}")
    }
}
