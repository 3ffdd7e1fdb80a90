//! Fixture Control - sACN receiver and actuator bridge
//!
//! This crate turns a network lighting feed into per-fixture channel data:
//! - **sACN**: universe registry, discovery, data dispatch and receiver lifecycle
//! - **Bridge**: forwarding of resolved channel bytes to an actuator
//! - **Fixture**: wiring a configured receiver to a bridge
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fixture_control::{sacn::LoopbackTransport, Fixture};
//! use std::sync::Arc;
//!
//! # fn main() -> fixture_control::Result<()> {
//! let transport = Arc::new(LoopbackTransport::new());
//! let mut fixture = Fixture::load_from_file(fixture_core::DEFAULT_CONFIG_FILE, transport)?;
//! fixture.start()?;
//! // ... packets flow until shutdown
//! fixture.stop()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`sacn`] - Universe registry, discovery and dispatch
//! - [`bridge`] - Actuator bridges
//! - [`fixture`] - Receiver to bridge wiring
//! - [`error`] - Error types

#![allow(missing_docs)]

/// Actuator bridges
pub mod bridge;
/// Error types
pub mod error;
/// Receiver to bridge wiring
pub mod fixture;
/// Receiver abstraction
pub mod receiver;
/// sACN universe receiver
pub mod sacn;

// Re-exports
pub use bridge::{Bridge, LogBridge, UdpBridge};
pub use error::{FixtureError, Result, ValidationError};
pub use fixture::Fixture;
pub use receiver::Receiver;
pub use sacn::{
    DataCallback, ReceiverState, SacnReceiver, Transport, Universe, UniverseRegistry,
};
