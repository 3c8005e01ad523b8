//! Message processing pipeline — the main handle_message flow.

use super::Gateway;
use crate::commands::{self, Command};
use remi_agent::{AgentExecutor, PromptBuilder, ReminderTool};
use remi_core::{message::IncomingMessage, traits::ReminderStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const FAILURE_REPLY: &str = "Sorry, I couldn't process that right now.";

impl Gateway {
    /// Process a single incoming message and reply to its sender.
    pub(super) async fn handle_message(&self, incoming: IncomingMessage) {
        let preview = if incoming.text.chars().count() > 60 {
            let truncated: String = incoming.text.chars().take(60).collect();
            format!("{truncated}...")
        } else {
            incoming.text.clone()
        };
        info!("[{}] {} says: {preview}", incoming.channel, incoming.sender_id);

        let reply = self
            .handle_text(&incoming.channel, &incoming.sender_id, &incoming.text)
            .await;
        self.send_text(&incoming, &reply).await;
    }

    /// Turn one text message into one reply.
    ///
    /// Commands are answered directly; everything else goes through a
    /// fresh reasoning session with the reminder tool bound to the
    /// sender. All errors collapse to a generic failure reply so the
    /// model's raw output and internal error detail never leak to chat.
    pub async fn handle_text(&self, channel: &str, sender_id: &str, text: &str) -> String {
        if let Some(command) = Command::parse(text) {
            return match commands::handle(command, self.store.as_ref(), sender_id).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!("command failed for {channel}:{sender_id}: {e}");
                    FAILURE_REPLY.to_string()
                }
            };
        }

        let tool = Arc::new(ReminderTool::new(
            sender_id,
            self.store.clone() as Arc<dyn ReminderStore>,
        ));
        let executor = match AgentExecutor::new(
            self.provider.clone(),
            vec![tool],
            PromptBuilder::new(&self.agent_config.tone_of_voice),
            self.agent_config.max_steps,
            Duration::from_secs(self.agent_config.model_timeout_secs),
        ) {
            Ok(exec) => exec,
            Err(e) => {
                error!("failed to build executor: {e}");
                return FAILURE_REPLY.to_string();
            }
        };

        match executor.run(text).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("reasoning session failed for {channel}:{sender_id}: {e}");
                FAILURE_REPLY.to_string()
            }
        }
    }
}
