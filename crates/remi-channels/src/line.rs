//! LINE Messaging API channel.
//!
//! Outbound delivery goes through the push API with the channel access
//! token. Inbound messages arrive from an external webhook transport
//! that verifies signatures with the channel secret and feeds decoded
//! events into this channel via [`LineChannel::inbound_sender`].

use async_trait::async_trait;
use remi_core::{
    config::LineConfig,
    error::RemiError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

const LINE_API_BASE: &str = "https://api.line.me/v2/bot";
const INBOUND_BUFFER: usize = 100;

#[derive(Serialize)]
struct PushRequest {
    to: String,
    messages: Vec<TextMessage>,
}

#[derive(Serialize)]
struct TextMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

impl TextMessage {
    fn new(text: String) -> Self {
        Self { kind: "text", text }
    }
}

/// LINE channel.
pub struct LineChannel {
    config: LineConfig,
    client: reqwest::Client,
    base_url: String,
    inbound_tx: mpsc::Sender<IncomingMessage>,
    inbound_rx: Mutex<Option<mpsc::Receiver<IncomingMessage>>>,
}

impl LineChannel {
    pub fn new(config: LineConfig) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_BUFFER);
        Self {
            config,
            client: reqwest::Client::new(),
            base_url: LINE_API_BASE.to_string(),
            inbound_tx,
            inbound_rx: Mutex::new(Some(inbound_rx)),
        }
    }

    /// Sender half for the webhook transport to inject decoded events.
    pub fn inbound_sender(&self) -> mpsc::Sender<IncomingMessage> {
        self.inbound_tx.clone()
    }
}

#[async_trait]
impl Channel for LineChannel {
    fn name(&self) -> &str {
        "line"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, RemiError> {
        let rx = self
            .inbound_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| RemiError::Channel("line channel already started".into()))?;
        info!("LINE channel started");
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), RemiError> {
        let to = message
            .reply_target
            .ok_or_else(|| RemiError::Channel("line push needs a recipient".into()))?;

        let body = PushRequest {
            to,
            messages: vec![TextMessage::new(message.text)],
        };

        let url = format!("{}/message/push", self.base_url);
        debug!("line: POST {url}");

        let resp = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.channel_access_token),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| RemiError::Channel(format!("line push failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(RemiError::Channel(format!(
                "line push returned {status}: {text}"
            )));
        }

        Ok(())
    }

    async fn stop(&self) -> Result<(), RemiError> {
        info!("LINE channel stopped");
        Ok(())
    }
}
