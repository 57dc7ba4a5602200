//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::LogLevel;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_waynebot_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, waynebot_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[server]
base_url = "https://chat.example.com"

[realtime]
max_retry_ms = 60000

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.base_url, "https://chat.example.com");
    assert_eq!(config.realtime.max_retry_ms, 60000);
    assert_eq!(config.logging.level, LogLevel::Debug);
    // Defaults preserved
    assert_eq!(config.server.ws_path, "/ws");
    assert_eq!(config.realtime.initial_retry_ms, 1000);
    assert!(config.auth.token.is_none());
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, waynebot_common::ConfigError::ParseError(_)));
}

#[test]
fn unknown_log_level_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, waynebot_common::ConfigError::ParseError(_)));
}

#[test]
fn invalid_values_are_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[realtime]\ninitial_retry_ms = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.realtime.initial_retry_ms, 0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("waynebot").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.base_url, "http://localhost:8080");
    assert_eq!(config.realtime.max_retry_ms, 30000);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::WaynebotConfig;

    let config: WaynebotConfig = toml::from_str(default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("waynebot"));
        assert!(path_str.ends_with("config.toml"));
    }
}

#[test]
fn parse_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[server\n").unwrap();

    match load_from_path(&path).unwrap_err() {
        waynebot_common::ConfigError::ParseError(msg) => {
            assert!(msg.contains("broken.toml"), "{msg}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn template_write_fails_when_parent_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("waynebot");
    std::fs::write(&blocker, "").unwrap();

    let err = create_default_config(&blocker.join("config.toml")).unwrap_err();
    assert!(matches!(err, waynebot_common::ConfigError::ParseError(_)));
}
