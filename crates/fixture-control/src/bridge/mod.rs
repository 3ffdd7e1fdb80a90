//! Actuator bridges
//!
//! A bridge takes the resolved channel bytes of a universe window and forwards them to
//! whatever drives the physical fixture. Sends are fire-and-forget from the receiver's
//! point of view: errors are reported to the caller but never retried.

mod log;
mod udp;

pub use log::LogBridge;
pub use udp::UdpBridge;

use fixture_core::BridgeConfig;
use std::sync::Arc;

use crate::Result;

/// Sink for resolved channel data
pub trait Bridge: Send + Sync {
    /// Short name of the bridge, e.g. `"udp"`
    fn bridge_type(&self) -> &'static str;

    fn send_data(&self, data: &[u8]) -> Result<()>;
}

/// Build the bridge described by `config`.
pub fn from_config(config: &BridgeConfig) -> Result<Arc<dyn Bridge>> {
    let bridge: Arc<dyn Bridge> = match config {
        BridgeConfig::Log => Arc::new(LogBridge::new()),
        BridgeConfig::Udp { target } => Arc::new(UdpBridge::new(target)?),
    };
    tracing::info!("Bridge type: {}", bridge.bridge_type());
    Ok(bridge)
}
