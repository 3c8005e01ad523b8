//! Gateway — the main event loop connecting channels, the reasoning
//! loop, and the reminder store.

mod pipeline;
mod scheduler;

use remi_core::{
    config::{AgentConfig, SchedulerConfig},
    message::{IncomingMessage, OutgoingMessage},
    traits::{Channel, Provider},
};
use remi_memory::Store;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};

/// The central gateway that routes messages between channels and the agent.
pub struct Gateway {
    pub(super) provider: Arc<dyn Provider>,
    pub(super) channels: HashMap<String, Arc<dyn Channel>>,
    pub(super) store: Arc<Store>,
    pub(super) agent_config: AgentConfig,
    pub(super) scheduler_config: SchedulerConfig,
    /// Tracks senders with an active reasoning session. New messages
    /// from a busy sender are buffered here and drained in order.
    pub(super) active_senders: Mutex<HashMap<String, Vec<IncomingMessage>>>,
}

impl Gateway {
    pub fn new(
        provider: Arc<dyn Provider>,
        channels: HashMap<String, Arc<dyn Channel>>,
        store: Store,
        agent_config: AgentConfig,
        scheduler_config: SchedulerConfig,
    ) -> Self {
        Self {
            provider,
            channels,
            store: Arc::new(store),
            agent_config,
            scheduler_config,
            active_senders: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "remi gateway running | provider: {} | channels: {}",
            self.provider.name(),
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        // Spawn the delivery scheduler.
        let sched_handle = if self.scheduler_config.enabled {
            let sched_store = self.store.clone();
            let delivery_channel = self
                .channels
                .get(&self.scheduler_config.channel)
                .cloned()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "scheduler delivery channel '{}' is not enabled",
                        self.scheduler_config.channel
                    )
                })?;
            let poll_secs = self.scheduler_config.poll_interval_secs;
            Some(tokio::spawn(async move {
                scheduler::scheduler_loop(sched_store, delivery_channel, poll_secs).await;
            }))
        } else {
            None
        };

        // Main event loop with graceful shutdown.
        loop {
            tokio::select! {
                Some(incoming) = rx.recv() => {
                    let gw = self.clone();
                    tokio::spawn(async move {
                        gw.dispatch_message(incoming).await;
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(&sched_handle).await;
        Ok(())
    }

    /// Dispatch a message: buffer if sender is busy, otherwise process.
    async fn dispatch_message(self: Arc<Self>, incoming: IncomingMessage) {
        let sender_key = format!("{}:{}", incoming.channel, incoming.sender_id);

        {
            let mut active = self.active_senders.lock().await;
            if let Some(buffer) = active.get_mut(&sender_key) {
                // Sender already has an active session — buffer this message.
                buffer.push(incoming.clone());
                info!("buffered message from {sender_key} (session in progress)");
                self.send_text(&incoming, "Got it, I'll get to this next.")
                    .await;
                return;
            }
            active.insert(sender_key.clone(), Vec::new());
        }

        self.handle_message(incoming).await;

        // Drain any buffered messages for this sender.
        loop {
            let next = {
                let mut active = self.active_senders.lock().await;
                match active.get_mut(&sender_key) {
                    Some(buf) if !buf.is_empty() => Some(buf.remove(0)),
                    _ => {
                        active.remove(&sender_key);
                        None
                    }
                }
            };

            match next {
                Some(buffered) => {
                    info!("processing buffered message from {sender_key}");
                    self.handle_message(buffered).await;
                }
                None => break,
            }
        }
    }

    /// Graceful shutdown: stop the scheduler and channels.
    async fn shutdown(&self, sched_handle: &Option<tokio::task::JoinHandle<()>>) {
        info!("Shutting down...");

        if let Some(h) = sched_handle {
            h.abort();
        }

        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }

        info!("Shutdown complete.");
    }

    /// Send a plain text message back to the sender.
    pub(super) async fn send_text(&self, incoming: &IncomingMessage, text: &str) {
        let msg = OutgoingMessage {
            text: text.to_string(),
            reply_target: incoming.reply_target.clone(),
        };

        if let Some(channel) = self.channels.get(&incoming.channel) {
            if let Err(e) = channel.send(msg).await {
                error!("failed to send message: {e}");
            }
        }
    }
}
