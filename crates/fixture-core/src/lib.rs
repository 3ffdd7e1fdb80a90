//! Fixture Core - Configuration and Logging
//!
//! This crate holds the pieces of a fixture that have no protocol logic of their own:
//! - Fixture configuration (receiver universes, bridge target, logging)
//! - Logging setup on top of `tracing-subscriber`
//! - Configuration error types

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    BridgeConfig, FixtureConfig, ReceiverConfig, ReceiverKind, UniverseConfig,
    DEFAULT_CONFIG_FILE,
};
pub use error::{ConfigError, Result};
pub use logging::LogConfig;
