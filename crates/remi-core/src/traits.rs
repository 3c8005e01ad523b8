use crate::{
    error::RemiError,
    message::{IncomingMessage, OutgoingMessage},
    reminder::Reminder,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Model provider trait — the brain.
///
/// The model call is an opaque text-in/text-out function: one prompt,
/// a set of stop sequences, raw completion text back. Potentially slow,
/// potentially failing; callers own the timeout.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider requires an API key to function.
    fn requires_api_key(&self) -> bool;

    /// Complete a prompt, stopping generation at any of the stop sequences.
    async fn complete(&self, prompt: &str, stop: &[String]) -> Result<String, RemiError>;

    /// Check if the provider is available and ready.
    async fn is_available(&self) -> bool;
}

/// Messaging channel trait — inbound messages and push delivery.
///
/// `send` doubles as the scheduler's notifier: its `Result` is the
/// success/failure signal that decides retry-vs-delete.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start the channel. Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, RemiError>;

    /// Push a message through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), RemiError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), RemiError>;
}

/// Reminder persistence trait, consumed by the reminder tool, the chat
/// commands, and the delivery scheduler.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Persist a reminder; returns the store-assigned id.
    async fn create(
        &self,
        owner: &str,
        text: &str,
        due_at: NaiveDateTime,
    ) -> Result<String, RemiError>;

    /// All reminders, ordered by due time.
    async fn list_all(&self) -> Result<Vec<Reminder>, RemiError>;

    /// Pending reminders for one owner, ordered by due time.
    async fn list_for_owner(&self, owner: &str) -> Result<Vec<Reminder>, RemiError>;

    /// Delete a reminder if it is still present. Returns `true` iff a
    /// row existed and was removed — the per-reminder delivery claim:
    /// of any number of concurrent deleters, exactly one sees `true`.
    async fn delete_if_present(&self, id: &str) -> Result<bool, RemiError>;
}
