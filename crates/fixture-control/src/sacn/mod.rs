//! sACN (E1.31) universe receiver
//!
//! sACN (Streaming ACN) carries DMX512 over IP multicast. Each universe has its own
//! multicast group (239.255.x.y), and sources periodically announce the universes they
//! send on the discovery universe (64214).
//!
//! ## Flow
//!
//! - Universes are registered with a channel window and a callback
//! - [`SacnReceiver::start`] joins the discovery universe and every registered universe
//! - Discovery packets join registered universes that are not connected yet
//! - Data packets are sliced to the window and handed to the universe callback
//!
//! ## Example Usage
//!
//! ```rust
//! use fixture_control::sacn::{DataPacket, LoopbackTransport, SacnPacket, SacnReceiver};
//! use std::sync::Arc;
//!
//! # fn main() -> fixture_control::Result<()> {
//! let transport = Arc::new(LoopbackTransport::new());
//! let mut receiver = SacnReceiver::new(transport.clone());
//!
//! // Listen to channels 1-7 of universe 1
//! receiver.register(1, 512, 1, 7, |data| {
//!     assert_eq!(data.len(), 7);
//! })?;
//!
//! receiver.start()?;
//! transport.deliver(
//!     SacnPacket::Data(DataPacket::new(1, vec![0; 512])),
//!     "10.0.0.1:5568".parse().unwrap(),
//! );
//! receiver.stop()?;
//! # Ok(())
//! # }
//! ```

mod discovery;
mod dispatch;
mod packet;
mod receiver;
mod stats;
mod transport;
mod universe;

pub use discovery::DiscoveryHandler;
pub use dispatch::DataDispatcher;
pub use packet::{
    DataPacket, DiscoveryPacket, PacketType, SacnPacket, SyncPacket, TerminationPacket,
    DISCOVERY_UNIVERSE,
};
pub use receiver::{ReceiverState, SacnReceiver};
pub use stats::ReceiverStats;
pub use transport::{LoopbackTransport, PacketCallback, TerminationCallback, Transport};
pub use universe::{
    AddOutcome, DataCallback, Universe, UniverseRegistry, MAX_CHANNELS, MAX_UNIVERSE,
    MIN_UNIVERSE,
};
