use fleet_motion::animation::Batch;
use map_protocol::ServerMessage;
use realtime::{Error, Result};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::SERVICE;

/// Decodes a raw server payload and routes it by message type.
///
/// Position broadcasts are queued for the animation driver. Other message
/// types are logged and dropped.
pub async fn handle(payload: &[u8], batches: &mpsc::Sender<Batch>) -> Result<()> {
    let message = ServerMessage::try_from(payload)?;
    trace!(kind = message.kind(), "server message received");

    match message {
        ServerMessage::VehiclePositions(positions) => {
            let timestamp = positions.timestamp;
            let batch = positions.into_batch();
            debug!(vehicles = batch.len(), timestamp, "queueing vehicle positions");

            batches
                .send(batch)
                .await
                .map_err(|e| Error::ChannelClosed(format!("animation driver has stopped: {e}")))?;
        }
        ServerMessage::Unsupported(kind) => {
            warn!(monotonic_counter.unhandled_messages = 1, kind = %kind, service = %SERVICE);
        }
    }

    Ok(())
}
