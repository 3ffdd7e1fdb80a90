//! sACN fixture example
//!
//! Loads a fixture config (default `config.json`, or the path given as the first
//! argument), sets up logging from its `logging` section and runs the fixture against
//! an in-process transport. A simulated lighting desk advertises its universes and
//! sends a few frames, which the fixture forwards to the configured bridge.
//!
//! ```text
//! cargo run -p fixture-control --example sacn_fixture -- my-fixture.json
//! ```

use anyhow::{Context, Result};
use fixture_control::sacn::{DataPacket, DiscoveryPacket, LoopbackTransport, SacnPacket};
use fixture_control::Fixture;
use fixture_core::{FixtureConfig, DEFAULT_CONFIG_FILE};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let (config, load_error) = match FixtureConfig::load(&path) {
        Ok(config) => (config, None),
        Err(e) => (FixtureConfig::default(), Some(e)),
    };

    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = fixture_core::logging::init(&config.logging)?;
    if let Some(e) = load_error {
        warn!("Could not load {:?} ({}), using the default fixture", path, e);
    }

    let transport = Arc::new(LoopbackTransport::new());
    let mut fixture = Fixture::from_config(&config, transport.clone())
        .context("Failed to build fixture")?;
    fixture.start().context("Failed to start fixture")?;

    let desk: SocketAddr = "127.0.0.1:5568".parse()?;
    let universes: Vec<u16> = config.receiver.universes.iter().map(|u| u.universe).collect();
    transport.deliver(
        SacnPacket::Discovery(DiscoveryPacket::new("example desk", universes.clone())),
        desk,
    );

    for frame in 0..4u8 {
        for &universe in &universes {
            let levels: Vec<u8> = (0..512u16)
                .map(|channel| (channel as u8).wrapping_add(frame.wrapping_mul(32)))
                .collect();
            transport.deliver(SacnPacket::Data(DataPacket::new(universe, levels)), desk);
        }
        thread::sleep(Duration::from_millis(25));
    }

    fixture.stop().context("Failed to stop fixture")?;
    info!("Example finished");
    Ok(())
}
