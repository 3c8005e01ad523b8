use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Sentinel owner for dry-run tool invocations. A reminder "created"
/// for this owner is never persisted, but the tool still reports
/// success so the reasoning loop behaves identically.
pub const DRY_RUN_OWNER: &str = "NULL_USER";

/// Textual format for reminder due times: minute precision, local time.
pub const DUE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A persisted reminder awaiting delivery.
///
/// Lifecycle is create → (list) → delete; rows are never updated in
/// place. A reminder leaves the store only when it has been handed to
/// the notifier (see the delivery scheduler).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Store-assigned identifier (UUID v4).
    pub id: String,
    /// Recipient to notify (LINE user ID).
    pub owner: String,
    /// Free-form reminder content.
    pub text: String,
    /// Wall-clock time at which the reminder becomes deliverable.
    pub due_at: NaiveDateTime,
    /// Set once at persistence time.
    pub created_at: NaiveDateTime,
}

impl Reminder {
    /// Whether this reminder is due at the given instant.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.due_at <= now
    }
}
