use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming message from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel name (e.g. "line").
    pub channel: String,
    /// Platform-specific user ID of the sender.
    pub sender_id: String,
    /// Message text content.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Platform-specific target for routing the response. For LINE this
    /// is the push destination (user ID); reply tokens belong to the
    /// webhook transport, not to the core.
    #[serde(default)]
    pub reply_target: Option<String>,
}

impl IncomingMessage {
    /// Build a text message addressed back to its sender.
    pub fn from_text(channel: &str, sender_id: &str, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.to_string(),
            sender_id: sender_id.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
            reply_target: Some(sender_id.to_string()),
        }
    }
}

/// An outgoing message to send through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Platform-specific target for routing (LINE user ID).
    #[serde(default)]
    pub reply_target: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_targets_sender() {
        let msg = IncomingMessage::from_text("line", "U123", "hello");
        assert_eq!(msg.channel, "line");
        assert_eq!(msg.sender_id, "U123");
        assert_eq!(msg.reply_target.as_deref(), Some("U123"));
    }
}
