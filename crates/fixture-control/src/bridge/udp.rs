//! Raw UDP forwarding to a remote actuator

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicU64, Ordering};

use super::Bridge;
use crate::{error::FixtureError, Result};

/// Forwards each channel window as a single UDP datagram
pub struct UdpBridge {
    socket: UdpSocket,
    target: SocketAddr,
    sent: AtomicU64,
}

impl UdpBridge {
    /// Create a new UDP bridge
    ///
    /// # Arguments
    /// * `target` - Actuator address (e.g. "127.0.0.1:8080")
    pub fn new(target: &str) -> Result<Self> {
        let target: SocketAddr = target.parse().map_err(|e| {
            FixtureError::BridgeError(format!("Invalid bridge target address '{}': {}", target, e))
        })?;

        let bind_addr = if target.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(bind_addr)?;

        tracing::info!("UDP bridge created -> {}", target);

        Ok(Self {
            socket,
            target,
            sent: AtomicU64::new(0),
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Number of datagrams sent so far
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

impl Bridge for UdpBridge {
    fn bridge_type(&self) -> &'static str {
        "udp"
    }

    fn send_data(&self, data: &[u8]) -> Result<()> {
        self.socket.send_to(data, self.target)?;
        self.sent.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Sent {} bytes to {}", data.len(), self.target);
        Ok(())
    }
}
