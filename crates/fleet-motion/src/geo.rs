//! Stateless geometry helpers for moving vehicles between two reports.

use ::geo::{Distance, Haversine, InterpolatePoint, Point};

use crate::types::{Coordinate, VehiclePosition};

/// Mean Earth radius of the sphere [`Haversine`] measures on, in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

// Below this, the two points are treated as coincident or antipodal and no
// unique great circle exists between them.
const DEGENERATE_SIN: f64 = 1e-6;

/// Returns the point `fraction` of the way along the great circle from `from`
/// to `to`.
///
/// Coincident and antipodal endpoints fall back to linear interpolation of
/// latitude and longitude.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn interpolate_great_circle(from: Coordinate, to: Coordinate, fraction: f64) -> Coordinate {
    if fraction == 0.0 || from == to {
        return from;
    }
    if fraction == 1.0 {
        return to;
    }

    let sin_angle = (distance_between(from, to) / EARTH_RADIUS_METERS).sin();
    if sin_angle.is_nan() || sin_angle < DEGENERATE_SIN {
        return Coordinate::new(
            (to.latitude - from.latitude).mul_add(fraction, from.latitude),
            (to.longitude - from.longitude).mul_add(fraction, from.longitude),
        );
    }

    Haversine::point_at_ratio_between(point(from), point(to), fraction).into()
}

/// Interpolates between two compass bearings along the shorter arc.
///
/// The result is not wrapped into `[0, 360)`: turning from 350° towards 10°
/// passes through 360°. Use [`normalize_bearing`] when a wrapped value is
/// needed.
#[must_use]
pub fn shortest_angle_interpolate(source_deg: f64, target_deg: f64, fraction: f64) -> f64 {
    let mut delta = target_deg - source_deg;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    delta.mul_add(fraction, source_deg)
}

/// Interpolates both the location and the heading of a vehicle.
#[must_use]
pub fn interpolate_position(
    source: &VehiclePosition, target: &VehiclePosition, fraction: f64,
) -> VehiclePosition {
    let point = interpolate_great_circle(source.coordinate(), target.coordinate(), fraction);
    VehiclePosition {
        latitude: point.latitude,
        longitude: point.longitude,
        bearing: shortest_angle_interpolate(source.bearing, target.bearing, fraction),
    }
}

/// Wraps a bearing into `[0, 360)`.
#[must_use]
pub fn normalize_bearing(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Great-circle distance between two points, in metres.
#[must_use]
pub fn distance_between(from: Coordinate, to: Coordinate) -> f64 {
    Haversine::distance(point(from), point(to))
}

// geo points are (x, y) = (longitude, latitude)
fn point(coordinate: Coordinate) -> Point<f64> {
    Point::new(coordinate.longitude, coordinate.latitude)
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}
