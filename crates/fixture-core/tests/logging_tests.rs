use fixture_core::logging::{self, LogConfig};

// One test per binary: the subscriber is process-global
#[test]
fn test_init_with_file_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = LogConfig {
        level: "debug".to_string(),
        console_output: false,
        file_output: true,
        log_directory: dir.path().join("logs"),
        file_prefix: "stage".to_string(),
        ..Default::default()
    };

    // Restarting on the same day appends to today's file
    std::fs::create_dir_all(&config.log_directory).unwrap();
    std::fs::write(config.current_log_path(), "earlier run\n").unwrap();

    let guard = logging::init(&config).expect("Failed to init logging");
    assert!(guard.is_some());
    tracing::info!("hello from the logging test");
    drop(guard);

    let log_path = config.current_log_path();
    assert!(log_path.exists());
    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.starts_with("earlier run"));
    assert!(contents.contains("Writing 'stage' logs"));
    assert!(contents.contains("hello from the logging test"));

    // A second subscriber cannot be installed
    assert!(logging::init(&LogConfig {
        console_output: false,
        ..Default::default()
    })
    .is_err());
}
