use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Control values derived from one wheel sample.
///
/// `steer` is the wheel angle mapped onto [-100, 100], `speed` the signed
/// throttle value after per-gear clamping, `gear` the selected gate
/// (0 = neutral, 1-6 forward, 7 reverse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlValues {
    pub steer: i32,
    pub speed: i32,
    pub gear: u8,
}

/// Datagram payload pushed to the drive unit. Gear stays off the wire;
/// the consumer acts on steering and speed only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryPacket {
    pub steer: i32,
    pub speed: i32,
}
