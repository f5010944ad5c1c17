//! # Live Map
//!
//! Client-side session for a live vehicle map. A [`MapSession`] feeds server
//! position broadcasts into the animation driver, exposes smoothly moving
//! vehicle positions to the renderer, and publishes the client's requests
//! (route lookups and viewport changes) back to the server.

mod config;
mod messaging;
mod provider;
mod viewport;

use fleet_motion::animation::Batch;
use fleet_motion::{AnimationDriver, FleetSnapshot, VehicleId, VehiclePosition, VehicleStore};
use map_protocol::ClientMessage;
use realtime::{Clock, Error, Publisher, Result, SystemClock};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

pub use self::config::Config;
pub use self::provider::ChannelPublisher;
pub use self::viewport::MapBounds;

const SERVICE: &str = "live-map";

/// A mounted live map.
///
/// Mounting starts the animation driver; unmounting, or dropping the session,
/// stops it.
#[derive(Debug)]
pub struct MapSession<P: Publisher> {
    config: Config,
    publisher: P,
    batches: mpsc::Sender<Batch>,
    positions: watch::Receiver<FleetSnapshot>,
    driver: AnimationDriver,
    selected: Option<VehicleId>,
}

impl<P: Publisher> MapSession<P> {
    /// Mounts a session driven by the system clock.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn mount(config: Config, publisher: P) -> Self {
        Self::mount_with_clock(config, publisher, SystemClock)
    }

    #[must_use]
    pub fn mount_with_clock<C>(config: Config, publisher: P, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        let store = VehicleStore::with_config(clock, &config.motion);
        let (batches, batch_rx) = mpsc::channel(config.motion.batch_buffer.max(1));
        let (driver, positions) = AnimationDriver::start(store, batch_rx, &config.motion);
        info!(viewport_updates = config.viewport_updates, service = %SERVICE, "map mounted");

        Self { config, publisher, batches, positions, driver, selected: None }
    }

    /// Handles a raw message from the server connection.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload is not a valid server message or the
    /// animation driver has stopped.
    pub async fn on_message(&self, payload: &[u8]) -> Result<()> {
        if let Err(e) = messaging::handle(payload, &self.batches).await {
            error!(
                monotonic_counter.processing_errors = 1,
                code = e.code(),
                error = %e.description(),
                service = %SERVICE
            );
            return Err(e);
        }
        Ok(())
    }

    /// Receiver notified each time rendered positions change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FleetSnapshot> {
        self.positions.clone()
    }

    /// The most recently rendered positions.
    #[must_use]
    pub fn positions(&self) -> FleetSnapshot {
        self.positions.borrow().clone()
    }

    /// Selects a vehicle and requests its route from the server.
    ///
    /// # Errors
    ///
    /// Returns an error when the identifier is empty, the vehicle is not
    /// currently on the map, or the request cannot be published.
    pub async fn select_vehicle(&mut self, vehicle_id: &str) -> Result<()> {
        if vehicle_id.is_empty() {
            return Err(realtime::bad_request!("vehicle id is empty"));
        }
        if !self.positions.borrow().contains(vehicle_id) {
            return Err(realtime::not_found!("vehicle {} is not on the map", vehicle_id));
        }

        self.selected = Some(vehicle_id.to_string());
        debug!(vehicle_id, "vehicle selected");
        self.publish(&ClientMessage::route_info(vehicle_id)).await
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Rendered position of the selected vehicle, if it is still on the map.
    #[must_use]
    pub fn selected_position(&self) -> Option<VehiclePosition> {
        let vehicle_id = self.selected.as_deref()?;
        self.positions.borrow().get(vehicle_id).copied()
    }

    /// Reports a viewport change to the server when viewport updates are
    /// enabled.
    ///
    /// # Errors
    ///
    /// Returns an error when the bounds are not finite coordinates or the
    /// update cannot be published.
    pub async fn bounds_changed(&self, bounds: MapBounds) -> Result<()> {
        if !self.config.viewport_updates {
            return Ok(());
        }
        if !bounds.is_finite() {
            return Err(realtime::bad_request!("viewport bounds are not finite: {:?}", bounds));
        }
        self.publish(&ClientMessage::viewport(bounds.center, bounds.radius())).await
    }

    /// Stops the animation driver and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error when the driver task panicked.
    pub async fn unmount(self) -> Result<()> {
        let reason = self.driver.shutdown().await?;
        info!(reason = ?reason, service = %SERVICE, "map unmounted");
        Ok(())
    }

    async fn publish(&self, message: &ClientMessage) -> Result<()> {
        let outbound = message.to_message()?;
        self.publisher.send(&outbound).await.map_err(|e| {
            Error::ChannelClosed(format!("publishing {}: {e}", message.kind()))
        })?;

        info!(monotonic_counter.messages_sent = 1, kind = message.kind(), service = %SERVICE);
        Ok(())
    }
}
