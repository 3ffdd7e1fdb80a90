use fixture_core::{BridgeConfig, ConfigError, FixtureConfig, UniverseConfig};
use tempfile::NamedTempFile;

#[test]
fn test_save_and_load_config() {
    let mut config = FixtureConfig::default();
    config.receiver.universes.push(UniverseConfig {
        universe: 42,
        channels: 128,
        start_channel: 100,
        fixture_channels: 29,
    });
    config.bridge = BridgeConfig::Udp {
        target: "192.168.1.50:7000".to_string(),
    };

    let file = NamedTempFile::new().unwrap();
    config.save(file.path()).expect("Failed to save config");

    let loaded = FixtureConfig::load(file.path()).expect("Failed to load config");
    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file() {
    let result = FixtureConfig::load("/nonexistent/fixture/config.json");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_load_malformed_file() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "{ \"receiver\": ").unwrap();

    let result = FixtureConfig::load(file.path());
    assert!(matches!(result, Err(ConfigError::Json(_))));
}
