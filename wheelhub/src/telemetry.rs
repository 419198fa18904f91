//! Fire-and-forget telemetry push to the drive unit.

use std::io;
use std::net::{SocketAddr, UdpSocket};

use tracing::debug;
use wheel_protocol::{ControlValues, TelemetryPacket};

/// One-shot transmission of mapped control values. Failure is reported,
/// not retried; the call site decides whether to care.
pub trait TelemetrySink: Send + Sync {
    fn forward(&self, values: &ControlValues) -> io::Result<()>;
}

/// Sends `TelemetryPacket` as UTF-8 JSON datagrams to a fixed destination.
///
/// A single socket is bound at startup and shared across all pushes;
/// concurrent `send_to` calls on a UDP socket are independent datagrams,
/// so no locking is needed.
pub struct UdpTelemetrySink {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl UdpTelemetrySink {
    pub fn bind(destination: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        Ok(Self {
            socket,
            destination,
        })
    }
}

impl TelemetrySink for UdpTelemetrySink {
    fn forward(&self, values: &ControlValues) -> io::Result<()> {
        let packet = TelemetryPacket {
            steer: values.steer,
            speed: values.speed,
        };
        let payload = serde_json::to_vec(&packet).map_err(io::Error::other)?;
        self.socket.send_to(&payload, self.destination)?;
        debug!(
            "sent {} telemetry bytes to {}",
            payload.len(),
            self.destination
        );
        Ok(())
    }
}
