//! The single registered capability: parse a `<time>,<text>` argument
//! and persist a reminder for the invoking owner.

use crate::tool::{Tool, ToolError};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use remi_core::reminder::{DRY_RUN_OWNER, DUE_TIME_FORMAT};
use remi_core::traits::ReminderStore;
use std::sync::Arc;
use tracing::info;

pub const REMINDER_TOOL_NAME: &str = "Set a reminder";

const DESCRIPTION: &str = "This is useful when you want to set a reminder to inform users of \
something later. The input for this tool is the date (yyyy-mm-dd HH:MM) and the reminder name, \
separated by commas. Example: 2020-09-24 15:08,Birthday party";

/// Registers reminders on behalf of one owner.
///
/// Bound per reasoning session: the owner comes from the inbound
/// message, never from model output. With the dry-run sentinel owner
/// nothing is persisted but the observation is the same.
pub struct ReminderTool {
    owner: String,
    store: Arc<dyn ReminderStore>,
}

impl ReminderTool {
    pub fn new(owner: impl Into<String>, store: Arc<dyn ReminderStore>) -> Self {
        Self {
            owner: owner.into(),
            store,
        }
    }
}

#[async_trait]
impl Tool for ReminderTool {
    fn name(&self) -> &str {
        REMINDER_TOOL_NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        // First comma only: the reminder text may itself contain commas.
        let (time_str, text) = input.split_once(',').ok_or_else(|| {
            ToolError::Argument(format!(
                "expected `<yyyy-mm-dd HH:MM>,<text>` separated by a comma, got `{input}`"
            ))
        })?;

        let due_at = NaiveDateTime::parse_from_str(time_str, DUE_TIME_FORMAT).map_err(|_| {
            ToolError::TimeFormat(format!(
                "`{time_str}` does not match `yyyy-mm-dd HH:MM`"
            ))
        })?;

        if self.owner != DRY_RUN_OWNER {
            self.store
                .create(&self.owner, text, due_at)
                .await
                .map_err(|e| ToolError::Store(e.to_string()))?;
        }

        let confirmation = format!(
            "Reminder set for {} with name {text}",
            due_at.format(DUE_TIME_FORMAT)
        );
        info!("{confirmation}");
        Ok(confirmation)
    }
}
