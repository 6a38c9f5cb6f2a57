//! Unit tests for connection configuration load/save/validate.

use crate::config::ClientConfig;
use crate::error::config::ConfigError;

use std::time::Duration;

#[test]
fn given_default_config_then_it_validates_and_points_at_localhost() {
    let config = ClientConfig::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.address(), "127.0.0.1:31416");
    assert_eq!(config.op_poll_interval(), Duration::from_millis(1000));
}

#[test]
fn given_missing_file_when_loaded_then_defaults_are_used() {
    let dir = tempfile::tempdir().unwrap();

    let config = ClientConfig::load(dir.path()).unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 31416);
}

#[test]
fn given_saved_config_when_loaded_then_values_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig {
        host: "10.0.0.5".to_string(),
        port: 31417,
        connect_timeout_secs: 10,
        ..ClientConfig::default()
    };

    config.save(dir.path()).unwrap();
    let loaded = ClientConfig::load(dir.path()).unwrap();

    assert_eq!(loaded.host, "10.0.0.5");
    assert_eq!(loaded.port, 31417);
    assert_eq!(loaded.connect_timeout(), Duration::from_secs(10));
}

#[test]
fn given_save_when_finished_then_no_temp_file_is_left_behind() {
    let dir = tempfile::tempdir().unwrap();

    ClientConfig::default().save(dir.path()).unwrap();

    assert!(dir.path().join("connection.json").exists());
    assert!(!dir.path().join("connection.json.tmp").exists());
}

/// **VALUE**: Verifies a corrupted file is an error rather than a silent
/// reset to defaults.
///
/// **WHY THIS MATTERS**: A user pointing at a remote client would be
/// reconnected to localhost without explanation if corruption fell back to
/// defaults.
///
/// **BUG THIS CATCHES**: Collapsing the missing-file and unreadable-file
/// paths into one.
#[test]
fn given_corrupted_json_when_loaded_then_parse_error_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("connection.json"), "{not json").unwrap();

    let result = ClientConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn given_partial_json_when_loaded_then_missing_fields_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("connection.json"),
        r#"{"host": "192.168.1.20"}"#,
    )
    .unwrap();

    let config = ClientConfig::load(dir.path()).unwrap();

    assert_eq!(config.host, "192.168.1.20");
    assert_eq!(config.port, 31416);
    assert_eq!(config.read_timeout_secs, 15);
}

#[test]
fn given_out_of_range_values_then_validation_rejects_each() {
    let zero_port = ClientConfig {
        port: 0,
        ..ClientConfig::default()
    };
    let empty_host = ClientConfig {
        host: String::new(),
        ..ClientConfig::default()
    };
    let huge_timeout = ClientConfig {
        connect_timeout_secs: 301,
        ..ClientConfig::default()
    };
    let frantic_polling = ClientConfig {
        op_poll_interval_ms: 10,
        ..ClientConfig::default()
    };

    for bad in [zero_port, empty_host, huge_timeout, frantic_polling] {
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}

#[test]
fn given_invalid_config_when_saved_then_nothing_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let bad = ClientConfig {
        port: 0,
        ..ClientConfig::default()
    };

    assert!(bad.save(dir.path()).is_err());
    assert!(!dir.path().join("connection.json").exists());
}

#[test]
fn given_unknown_future_version_then_validation_rejects_it() {
    let from_the_future = ClientConfig {
        version: 99,
        ..ClientConfig::default()
    };

    assert!(from_the_future.validate().is_err());
}
