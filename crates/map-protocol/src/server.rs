//! Messages pushed by the server.

use fleet_motion::{VehiclePosition, VehicleSnapshot};
use realtime::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Type tag of the periodic vehicle position broadcast.
pub const VEHICLE_POSITIONS: &str = "vehicle-positions";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

/// A decoded server message.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Latest known positions for the vehicles in view.
    VehiclePositions(VehiclePositions),

    /// A message type this client does not handle, by tag.
    Unsupported(String),
}

impl ServerMessage {
    /// The envelope type tag.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::VehiclePositions(_) => VEHICLE_POSITIONS,
            Self::Unsupported(kind) => kind,
        }
    }
}

impl TryFrom<&[u8]> for ServerMessage {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let envelope: Envelope = serde_json::from_slice(bytes)?;
        if envelope.kind.is_empty() {
            return Err(realtime::invalid_format!("message type is empty"));
        }

        match envelope.kind.as_str() {
            VEHICLE_POSITIONS => {
                let positions = serde_json::from_value(envelope.payload)?;
                Ok(Self::VehiclePositions(positions))
            }
            _ => Ok(Self::Unsupported(envelope.kind)),
        }
    }
}

/// Payload of a `vehicle-positions` message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehiclePositions {
    /// Server time of the broadcast, in seconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: u64,

    pub positions: Vec<VehicleEntry>,
}

impl VehiclePositions {
    /// Converts the payload into a batch for the vehicle store.
    #[must_use]
    pub fn into_batch(self) -> Vec<VehicleSnapshot> {
        self.positions.into_iter().map(VehicleSnapshot::from).collect()
    }
}

/// A single vehicle in a `vehicle-positions` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleEntry {
    /// Vehicle identifier. Older servers send a numeric `descriptorId`.
    #[serde(alias = "descriptorId", deserialize_with = "id_string")]
    pub id: String,

    pub position: VehiclePosition,
}

impl From<VehicleEntry> for VehicleSnapshot {
    fn from(entry: VehicleEntry) -> Self {
        Self { vehicle_id: entry.id, position: entry.position }
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}
