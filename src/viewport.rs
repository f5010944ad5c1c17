use fleet_motion::Coordinate;
use fleet_motion::geo::distance_between;

/// Visible map area, as reported by the host map widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub center: Coordinate,
    pub north_east: Coordinate,
}

impl MapBounds {
    #[must_use]
    pub const fn new(center: Coordinate, north_east: Coordinate) -> Self {
        Self { center, north_east }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.center, self.north_east]
            .iter()
            .all(|c| c.latitude.is_finite() && c.longitude.is_finite())
    }

    /// Radius of the circle around the center that covers the visible area,
    /// in metres.
    #[must_use]
    pub fn radius(&self) -> f64 {
        distance_between(self.center, self.north_east)
    }
}
