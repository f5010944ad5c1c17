//! Motion model types.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Stable, string-comparable vehicle identifier.
pub type VehicleId = String;

/// A point on the Earth's surface, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Reported or interpolated vehicle position.
///
/// `bearing` is a compass heading in degrees. Interpolated bearings are not
/// wrapped, so may fall outside `[0, 360)`; see
/// [`crate::geo::normalize_bearing`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VehiclePosition {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub bearing: f64,
}

impl VehiclePosition {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, bearing: f64) -> Self {
        Self { latitude, longitude, bearing }
    }

    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate { latitude: self.latitude, longitude: self.longitude }
    }
}

/// One entry of a snapshot batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSnapshot {
    pub vehicle_id: VehicleId,
    pub position: VehiclePosition,
}

impl VehicleSnapshot {
    #[must_use]
    pub fn new(vehicle_id: impl Into<VehicleId>, position: VehiclePosition) -> Self {
        Self { vehicle_id: vehicle_id.into(), position }
    }
}

/// Motion of a single vehicle across the current interpolation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleMotion {
    pub(crate) source: VehiclePosition,
    pub(crate) target: VehiclePosition,
    pub(crate) current: VehiclePosition,
}

impl VehicleMotion {
    /// A vehicle seen for the first time starts and ends at its first report.
    pub(crate) const fn stationary(position: VehiclePosition) -> Self {
        Self { source: position, target: position, current: position }
    }

    /// Position at the start of the current window.
    #[must_use]
    pub const fn source(&self) -> VehiclePosition {
        self.source
    }

    /// Position from the most recent snapshot.
    #[must_use]
    pub const fn target(&self) -> VehiclePosition {
        self.target
    }

    /// Interpolated position for rendering.
    #[must_use]
    pub const fn current(&self) -> VehiclePosition {
        self.current
    }
}

/// Immutable view of every tracked vehicle's current position.
///
/// Cloning is cheap; renderers hold a shared copy and can never write back
/// into the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetSnapshot {
    positions: Arc<HashMap<VehicleId, VehiclePosition>>,
}

impl FleetSnapshot {
    #[must_use]
    pub fn new(positions: HashMap<VehicleId, VehiclePosition>) -> Self {
        Self { positions: Arc::new(positions) }
    }

    #[must_use]
    pub fn get(&self, vehicle_id: &str) -> Option<&VehiclePosition> {
        self.positions.get(vehicle_id)
    }

    #[must_use]
    pub fn contains(&self, vehicle_id: &str) -> bool {
        self.positions.contains_key(vehicle_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VehicleId, &VehiclePosition)> {
        self.positions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
