use anyhow::{Result, anyhow};
use realtime::{Message, Publisher};
use tokio::sync::mpsc;

/// Publishes client messages onto a channel drained by the host's socket
/// writer.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    outbound: mpsc::Sender<Message>,
}

impl ChannelPublisher {
    #[must_use]
    pub const fn new(outbound: mpsc::Sender<Message>) -> Self {
        Self { outbound }
    }
}

impl Publisher for ChannelPublisher {
    async fn send(&self, message: &Message) -> Result<()> {
        self.outbound
            .send(message.clone())
            .await
            .map_err(|e| anyhow!("outbound channel closed: {e}"))
    }
}
