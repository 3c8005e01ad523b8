//! Chat commands — short text messages handled without the model.

use remi_core::{error::RemiError, reminder::DUE_TIME_FORMAT, traits::ReminderStore};
use tracing::info;

/// Seconds ahead of now for the `dbg` probe reminder.
const DEBUG_REMINDER_OFFSET_SECS: i64 = 10;

/// A recognized chat command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `ls` — list the sender's pending reminders.
    List,
    /// `dbg` — create a reminder due almost immediately, to exercise
    /// the delivery path end to end.
    Debug,
}

impl Command {
    /// Parse a message as a command, if it is one.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "ls" => Some(Self::List),
            "dbg" => Some(Self::Debug),
            _ => None,
        }
    }
}

/// Execute a command on behalf of a sender, returning the reply text.
pub async fn handle(
    command: Command,
    store: &dyn ReminderStore,
    sender_id: &str,
) -> Result<String, RemiError> {
    match command {
        Command::List => {
            let reminders = store.list_for_owner(sender_id).await?;
            if reminders.is_empty() {
                return Ok("No pending reminders.".to_string());
            }
            let lines: Vec<String> = reminders
                .iter()
                .map(|r| format!("{} — {}", r.due_at.format(DUE_TIME_FORMAT), r.text))
                .collect();
            Ok(lines.join("\n"))
        }
        Command::Debug => {
            let due_at = chrono::Local::now().naive_local()
                + chrono::Duration::seconds(DEBUG_REMINDER_OFFSET_SECS);
            let id = store.create(sender_id, "debug ping", due_at).await?;
            info!("dbg: created probe reminder {id} for {sender_id}");
            Ok(format!(
                "Debug reminder created, due in {DEBUG_REMINDER_OFFSET_SECS}s."
            ))
        }
    }
}
