//! Fixture wiring: a receiver feeding an actuator bridge

use fixture_core::{FixtureConfig, ReceiverConfig, ReceiverKind};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::bridge::{self, Bridge};
use crate::error::{FixtureError, Result};
use crate::receiver::Receiver;
use crate::sacn::{SacnReceiver, Transport};

/// A receiver whose universe windows are forwarded to a bridge
pub struct Fixture {
    receiver: Box<dyn Receiver>,
    bridge: Arc<dyn Bridge>,
    config: ReceiverConfig,
}

impl Fixture {
    pub fn new(
        receiver: Box<dyn Receiver>,
        bridge: Arc<dyn Bridge>,
        config: ReceiverConfig,
    ) -> Self {
        Self {
            receiver,
            bridge,
            config,
        }
    }

    /// Build the receiver and bridge described by `config`.
    pub fn from_config(config: &FixtureConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        info!("Building {} fixture", config.receiver.kind.as_str());
        let receiver: Box<dyn Receiver> = match config.receiver.kind {
            ReceiverKind::Sacn => Box::new(SacnReceiver::new(transport)),
        };
        let bridge = bridge::from_config(&config.bridge)?;
        Ok(Self::new(receiver, bridge, config.receiver.clone()))
    }

    pub fn load_from_file(path: impl AsRef<Path>, transport: Arc<dyn Transport>) -> Result<Self> {
        let config = FixtureConfig::load(path)?;
        Self::from_config(&config, transport)
    }

    pub fn receiver_type(&self) -> &'static str {
        self.receiver.receiver_type()
    }

    pub fn bridge(&self) -> &Arc<dyn Bridge> {
        &self.bridge
    }

    /// Configure the receiver, route every configured universe to the bridge and start
    /// listening.
    pub fn start(&mut self) -> Result<()> {
        self.receiver.configure(&self.config);

        for entry in &self.config.universes {
            let bridge = self.bridge.clone();
            let handler = Arc::new(move |data: &[u8]| bridge_packet(bridge.as_ref(), data));
            match self.receiver.add_data_handler(entry.universe, handler) {
                Ok(()) => {}
                // Rejected during configure and already logged
                Err(FixtureError::UniverseNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        info!(
            "Receiver type: {}, bridge type: {}",
            self.receiver.receiver_type(),
            self.bridge.bridge_type()
        );

        self.receiver.start()
    }

    pub fn stop(&mut self) -> Result<()> {
        self.receiver.stop()
    }
}

fn bridge_packet(bridge: &dyn Bridge, data: &[u8]) {
    if let Err(e) = bridge.send_data(data) {
        warn!("Bridge {} failed to send data: {}", bridge.bridge_type(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::LogBridge;
    use crate::sacn::LoopbackTransport;
    use fixture_core::BridgeConfig;

    #[test]
    fn test_from_default_config() {
        let fixture =
            Fixture::from_config(&FixtureConfig::default(), Arc::new(LoopbackTransport::new()))
                .unwrap();
        assert_eq!(fixture.receiver_type(), "sacn");
        assert_eq!(fixture.bridge().bridge_type(), "log");
    }

    #[test]
    fn test_start_and_stop() {
        let transport = Arc::new(LoopbackTransport::new());
        let mut fixture = Fixture::new(
            Box::new(SacnReceiver::new(transport.clone())),
            Arc::new(LogBridge::new()),
            ReceiverConfig::default(),
        );

        fixture.start().unwrap();
        assert!(transport.is_joined(1));
        fixture.stop().unwrap();
        assert!(!transport.is_running());
    }

    #[test]
    fn test_invalid_bridge_config() {
        let config = FixtureConfig {
            bridge: BridgeConfig::Udp {
                target: "nowhere".to_string(),
            },
            ..Default::default()
        };
        let result = Fixture::from_config(&config, Arc::new(LoopbackTransport::new()));
        assert!(matches!(result, Err(FixtureError::BridgeError(_))));
    }
}
