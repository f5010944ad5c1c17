//! Requests sent to the server.

use fleet_motion::Coordinate;
use realtime::{Message, Result};
use serde::{Deserialize, Serialize};

/// Message sent by the map client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Ask for the route of the vehicle identified by `line`.
    GetRouteInfo { line: String },

    /// Tell the server which part of the map is visible.
    GeoPositionUpdate(GeoPositionUpdate),
}

impl ClientMessage {
    #[must_use]
    pub fn route_info(vehicle_id: impl Into<String>) -> Self {
        Self::GetRouteInfo { line: vehicle_id.into() }
    }

    /// Viewport centred on `center` whose bounding sphere has a radius of
    /// `max_distance` metres.
    #[must_use]
    pub const fn viewport(center: Coordinate, max_distance: f64) -> Self {
        Self::GeoPositionUpdate(GeoPositionUpdate {
            max_distance,
            position: GeoPoint::point(center),
        })
    }

    /// The envelope type tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::GetRouteInfo { .. } => "get-route-info",
            Self::GeoPositionUpdate(_) => "geo-position-update",
        }
    }

    /// Serializes the message for the outbound channel.
    ///
    /// # Errors
    ///
    /// Returns an error when the message cannot be serialized.
    pub fn to_message(&self) -> Result<Message> {
        let payload = serde_json::to_vec(self)?;
        Ok(Message::new(&payload).with_header("type", self.kind()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPositionUpdate {
    /// Radius of the visible area, in metres.
    pub max_distance: f64,
    pub position: GeoPoint,
}

/// `GeoJSON` point with `[latitude, longitude]` coordinates, the order the
/// server expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: GeoKind,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    #[must_use]
    pub const fn point(center: Coordinate) -> Self {
        Self { kind: GeoKind::Point, coordinates: [center.latitude, center.longitude] }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoKind {
    #[default]
    Point,
}
