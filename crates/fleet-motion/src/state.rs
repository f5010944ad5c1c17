//! # Vehicle State Store
//!
//! Owns the tracked fleet and its per-vehicle motion models. State changes
//! only through [`VehicleStore::ingest`] and [`VehicleStore::advance_tick`].

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use realtime::{Clock, SystemClock};
use tracing::{debug, trace};

use crate::config::MotionConfig;
use crate::geo;
use crate::types::{FleetSnapshot, VehicleId, VehicleMotion, VehiclePosition, VehicleSnapshot};

/// Counts of what a batch did to the tracked set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Result of a single animation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No vehicles are tracked.
    Idle,

    /// The window has elapsed; vehicles hold still until the next batch.
    Settled,

    /// Every vehicle moved to `fraction` of the way through the window.
    Advanced { fraction: f64 },
}

impl TickOutcome {
    #[must_use]
    pub const fn is_advanced(&self) -> bool {
        matches!(self, Self::Advanced { .. })
    }
}

#[derive(Debug, Default)]
struct FleetState {
    // wall-clock millis of the last ingest; `None` until the first batch
    last_update: Option<i64>,
    window_millis: i64,
    vehicles: HashMap<VehicleId, VehicleMotion>,
}

/// Tracked fleet with interpolated positions.
#[derive(Debug)]
pub struct VehicleStore<C = SystemClock> {
    clock: C,
    initial_window: i64,
    state: FleetState,
}

impl Default for VehicleStore<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> VehicleStore<C> {
    /// Creates an empty store reading time from `clock`.
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, &MotionConfig::default())
    }

    pub fn with_config(clock: C, config: &MotionConfig) -> Self {
        let initial_window = config.initial_window_millis();
        Self {
            clock,
            initial_window,
            state: FleetState { window_millis: initial_window, ..FleetState::default() },
        }
    }

    /// Installs a new snapshot batch and opens a new interpolation window.
    ///
    /// Vehicles already tracked continue from their previous target; new
    /// vehicles start stationary at their reported position; vehicles missing
    /// from the batch are dropped. An empty batch clears the fleet.
    pub fn ingest<I>(&mut self, batch: I) -> IngestSummary
    where
        I: IntoIterator<Item = VehicleSnapshot>,
    {
        let now = self.clock.now_millis();
        self.state.window_millis =
            self.state.last_update.map_or(self.initial_window, |last| (now - last).max(1));
        self.state.last_update = Some(now);

        let batch: Vec<VehicleSnapshot> = batch.into_iter().collect();

        let before = self.state.vehicles.len();
        {
            let present: HashSet<&str> = batch.iter().map(|e| e.vehicle_id.as_str()).collect();
            self.state.vehicles.retain(|id, _| present.contains(id.as_str()));
        }
        let mut summary =
            IngestSummary { removed: before - self.state.vehicles.len(), ..IngestSummary::default() };

        // a carried-over vehicle listed twice is rebased once and the later
        // entry sets the target; a new one stays stationary at its last entry
        let mut rebased: HashSet<VehicleId> = HashSet::with_capacity(batch.len());
        let mut fresh: HashSet<VehicleId> = HashSet::new();

        for VehicleSnapshot { vehicle_id, position } in batch {
            match self.state.vehicles.entry(vehicle_id) {
                Entry::Occupied(mut entry) if fresh.contains(entry.key()) => {
                    *entry.get_mut() = VehicleMotion::stationary(position);
                }
                Entry::Occupied(mut entry) => {
                    if rebased.insert(entry.key().clone()) {
                        let motion = entry.get_mut();
                        motion.source = motion.target;
                        motion.current = motion.target;
                        summary.updated += 1;
                    }
                    entry.get_mut().target = position;
                }
                Entry::Vacant(entry) => {
                    fresh.insert(entry.key().clone());
                    entry.insert(VehicleMotion::stationary(position));
                    summary.added += 1;
                }
            }
        }

        debug!(
            added = summary.added,
            updated = summary.updated,
            removed = summary.removed,
            window_ms = self.state.window_millis,
            "ingested vehicle batch"
        );

        summary
    }

    /// Moves every vehicle to where it should be at the current time.
    ///
    /// Once the elapsed fraction of the window exceeds 1 the call leaves state
    /// untouched until the next [`ingest`](Self::ingest).
    pub fn advance_tick(&mut self) -> TickOutcome {
        if self.state.vehicles.is_empty() {
            return TickOutcome::Idle;
        }
        let Some(last_update) = self.state.last_update else {
            return TickOutcome::Idle;
        };

        let elapsed = self.clock.now_millis() - last_update;
        #[allow(clippy::cast_precision_loss)]
        let fraction = elapsed as f64 / self.state.window_millis as f64;

        if fraction > 1.0 {
            trace!(fraction, "window elapsed, awaiting next batch");
            return TickOutcome::Settled;
        }

        for motion in self.state.vehicles.values_mut() {
            motion.current = geo::interpolate_position(&motion.source, &motion.target, fraction);
        }
        trace!(fraction, vehicles = self.state.vehicles.len(), "advanced tick");

        TickOutcome::Advanced { fraction }
    }

    /// Current positions of all tracked vehicles.
    pub fn positions(&self) -> impl Iterator<Item = (&VehicleId, VehiclePosition)> {
        self.state.vehicles.iter().map(|(id, motion)| (id, motion.current))
    }

    #[must_use]
    pub fn position(&self, vehicle_id: &str) -> Option<VehiclePosition> {
        self.state.vehicles.get(vehicle_id).map(VehicleMotion::current)
    }

    #[must_use]
    pub fn motion(&self, vehicle_id: &str) -> Option<&VehicleMotion> {
        self.state.vehicles.get(vehicle_id)
    }

    /// Owned, read-only copy of the current positions.
    #[must_use]
    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot::new(
            self.state
                .vehicles
                .iter()
                .map(|(id, motion)| (id.clone(), motion.current))
                .collect(),
        )
    }

    /// Duration of the current interpolation window, in milliseconds.
    #[must_use]
    pub const fn window_millis(&self) -> i64 {
        self.state.window_millis
    }

    /// Wall-clock millis of the last ingest.
    #[must_use]
    pub const fn last_update(&self) -> Option<i64> {
        self.state.last_update
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.vehicles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.vehicles.is_empty()
    }
}
