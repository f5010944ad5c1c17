//! # Fleet Motion
//!
//! Turns sparse, timestamped vehicle position snapshots into continuous
//! motion. The [`VehicleStore`] owns one motion model per vehicle and is
//! advanced on a fixed cadence by the [`AnimationDriver`].

pub mod animation;
pub mod config;
pub mod geo;
pub mod state;
pub mod types;

pub use self::animation::AnimationDriver;
pub use self::config::MotionConfig;
pub use self::state::{IngestSummary, TickOutcome, VehicleStore};
pub use self::types::*;
