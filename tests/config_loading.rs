//! Configuration resolution, parsing, and environment overrides.
//!
//! Env-var tests share process state, so everything touching the
//! environment runs under `#[serial]`.

use pretty_assertions::assert_eq;
use quietport::config::{Config, ConfigError, ConfigLoader};
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;

fn clear_env() {
    for var in [
        "QUIETPORT_CONFIG",
        "QUIETPORT_SERIAL_DEVICE",
        "QUIETPORT_SERIAL_BAUD",
        "QUIETPORT_SERIAL_TIMEOUT_SECS",
        "QUIETPORT_SERIAL_POLL_INTERVAL_MS",
        "QUIETPORT_LOG_LEVEL",
    ] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn defaults_without_file_or_env() {
    clear_env();
    let loader = ConfigLoader::with_defaults().expect("defaults");
    let config = loader.config();

    assert_eq!(config.serial.device, PathBuf::from("/dev/ttyAMA0"));
    assert_eq!(config.serial.baud, 57_600);
    assert_eq!(config.serial.timeout_secs, 15);
    assert_eq!(config.logging.level, "info");
}

#[test]
#[serial]
fn loads_a_toml_file() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"
        [serial]
        device = "/dev/ttyS3"
        baud = 19200
        timeout_secs = 4

        [serial.stty]
        combination = "sane"

        [logging]
        level = "debug"
        "#
    )
    .expect("write config");

    let loader = ConfigLoader::load_from(file.path()).expect("load");
    let config = loader.config();

    assert_eq!(config.serial.device, PathBuf::from("/dev/ttyS3"));
    assert_eq!(config.serial.baud, 19_200);
    assert_eq!(config.serial.timeout_secs, 4);
    assert_eq!(config.serial.stty.combination, "sane");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(loader.config_path, Some(file.path().to_path_buf()));
}

#[test]
#[serial]
fn env_vars_override_file_values() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"
        [serial]
        baud = 19200
        "#
    )
    .expect("write config");

    std::env::set_var("QUIETPORT_SERIAL_BAUD", "115200");
    std::env::set_var("QUIETPORT_SERIAL_DEVICE", "/dev/ttyUSB7");
    std::env::set_var("QUIETPORT_LOG_LEVEL", "trace");

    let loader = ConfigLoader::load_from(file.path()).expect("load");
    let config = loader.config();

    assert_eq!(config.serial.baud, 115_200);
    assert_eq!(config.serial.device, PathBuf::from("/dev/ttyUSB7"));
    assert_eq!(config.logging.level, "trace");

    clear_env();
}

#[test]
#[serial]
fn bad_env_value_is_reported() {
    clear_env();
    std::env::set_var("QUIETPORT_SERIAL_BAUD", "fast");

    let result = ConfigLoader::with_defaults();
    assert!(matches!(
        result,
        Err(ConfigError::EnvParseError { ref var, .. }) if var == "QUIETPORT_SERIAL_BAUD"
    ));

    clear_env();
}

#[test]
#[serial]
fn unreadable_path_is_reported() {
    clear_env();
    let result = ConfigLoader::load_from("/definitely/not/a/config.toml");
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}

#[test]
fn config_round_trips_through_toml() {
    let config = Config::default();
    let rendered = toml::to_string_pretty(&config).expect("serialize");
    let parsed: Config = toml::from_str(&rendered).expect("parse");

    assert_eq!(parsed.serial.device, config.serial.device);
    assert_eq!(parsed.serial.stty.control, config.serial.stty.control);
    assert_eq!(
        parsed.serial.to_port_settings(),
        config.serial.to_port_settings()
    );
}
