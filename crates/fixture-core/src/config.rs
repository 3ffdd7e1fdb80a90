//! Fixture configuration
//!
//! A fixture is described by a single JSON document with three sections:
//!
//! ```json
//! {
//!   "receiver": {
//!     "type": "sacn",
//!     "universes": [
//!       { "universe": 1, "channels": 512, "start_channel": 1, "fixture_channels": 7 }
//!     ]
//!   },
//!   "bridge": { "type": "udp", "target": "127.0.0.1:8080" },
//!   "logging": { "level": "info" }
//! }
//! ```
//!
//! Every section is optional and falls back to its default. Universe ranges are not
//! checked here; the receiver validates them when it registers each entry.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::logging::LogConfig;

/// File name the fixture looks for when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Top-level fixture configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Which universes to listen to
    pub receiver: ReceiverConfig,
    /// Where resolved channel data goes
    pub bridge: BridgeConfig,
    /// Logging setup
    pub logging: LogConfig,
}

impl FixtureConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        tracing::debug!(
            "Loaded fixture config from {:?} ({} universes)",
            path,
            config.receiver.universes.len()
        );
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Structural checks that do not depend on protocol limits.
    pub fn validate(&self) -> Result<()> {
        if let BridgeConfig::Udp { target } = &self.bridge {
            if target.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "udp bridge requires a target address".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Receiver implementation selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiverKind {
    /// Streaming ACN (E1.31)
    #[default]
    Sacn,
}

impl ReceiverKind {
    /// Short name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiverKind::Sacn => "sacn",
        }
    }
}

/// Receiver section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Receiver protocol
    #[serde(rename = "type", default)]
    pub kind: ReceiverKind,
    /// Universes to register
    #[serde(default)]
    pub universes: Vec<UniverseConfig>,
}

impl Default for ReceiverConfig {
    /// A single 512-channel universe with a seven channel fixture at address 1.
    fn default() -> Self {
        Self {
            kind: ReceiverKind::Sacn,
            universes: vec![UniverseConfig {
                universe: 1,
                channels: 512,
                start_channel: 1,
                fixture_channels: 7,
            }],
        }
    }
}

/// One universe the fixture listens to.
///
/// `start_channel` is 1-based, matching the addressing printed on lighting desks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// sACN universe number
    pub universe: u16,
    /// Size of the universe
    pub channels: u16,
    /// First channel the fixture uses
    pub start_channel: u16,
    /// Number of channels the fixture uses
    pub fixture_channels: u16,
}

/// Actuator bridge section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BridgeConfig {
    /// Log every payload instead of forwarding it
    #[default]
    Log,
    /// Forward raw channel bytes as UDP datagrams
    Udp {
        /// Actuator address, e.g. `127.0.0.1:8080`
        target: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FixtureConfig::default();
        assert_eq!(config.receiver.kind, ReceiverKind::Sacn);
        assert_eq!(config.receiver.universes.len(), 1);
        assert_eq!(
            config.receiver.universes[0],
            UniverseConfig {
                universe: 1,
                channels: 512,
                start_channel: 1,
                fixture_channels: 7,
            }
        );
        assert_eq!(config.bridge, BridgeConfig::Log);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "receiver": {
                "type": "sacn",
                "universes": [
                    { "universe": 3, "channels": 256, "start_channel": 10, "fixture_channels": 4 },
                    { "universe": 4, "channels": 512, "start_channel": 1, "fixture_channels": 512 }
                ]
            },
            "bridge": { "type": "udp", "target": "10.0.0.2:9000" },
            "logging": { "level": "debug", "console_output": false }
        }"#;

        let config = FixtureConfig::from_json(json).unwrap();
        assert_eq!(config.receiver.universes.len(), 2);
        assert_eq!(config.receiver.universes[0].start_channel, 10);
        assert_eq!(
            config.bridge,
            BridgeConfig::Udp {
                target: "10.0.0.2:9000".to_string()
            }
        );
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.console_output);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = FixtureConfig::from_json("{}").unwrap();
        assert_eq!(config, FixtureConfig::default());
    }

    #[test]
    fn test_empty_universe_list() {
        let config = FixtureConfig::from_json(r#"{ "receiver": { "type": "sacn" } }"#).unwrap();
        assert!(config.receiver.universes.is_empty());
    }

    #[test]
    fn test_unknown_receiver_type_rejected() {
        let result = FixtureConfig::from_json(r#"{ "receiver": { "type": "artnet" } }"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_udp_bridge_without_target_rejected() {
        let result = FixtureConfig::from_json(r#"{ "bridge": { "type": "udp", "target": " " } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
