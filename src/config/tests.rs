use super::settings::{ClientSettings, Settings};
use super::load_config_from;
use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.client.host, "localhost");
    assert_eq!(settings.client.port, 9620);
    assert_eq!(settings.client.io_timeout_ms, 5_000);
    assert!(settings.client.retry_max_attempts.is_none());
    assert!(!settings.client.name.is_empty());
    assert_eq!(settings.broker.host, "127.0.0.1");
    assert_eq!(settings.broker.port, 9620);
}

#[test]
#[serial]
fn test_default_name_falls_back_to_uuid() {
    temp_env::with_var("USER", None::<&str>, || {
        let settings = ClientSettings::default();
        assert!(settings.name.starts_with("client-"));
    });
    temp_env::with_var("USER", Some("alice"), || {
        assert_eq!(ClientSettings::default().name, "alice");
    });
}

#[test]
fn test_client_settings_new_and_durations() {
    let settings = ClientSettings::new("alice", "example.org", 7000);
    assert_eq!(settings.name, "alice");
    assert_eq!(settings.host, "example.org");
    assert_eq!(settings.port, 7000);
    assert_eq!(settings.io_timeout(), Duration::from_secs(5));
    assert_eq!(settings.poll_interval(), Duration::from_millis(50));

    let policy = settings.retry_policy();
    assert_eq!(policy.base, Duration::from_millis(100));
    assert_eq!(policy.max, Duration::from_secs(5));
    assert_eq!(policy.max_attempts, None);
}

#[test]
#[serial]
fn test_load_config_from_file_overrides_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = tmp.path().join("client.toml");
    let toml = r#"
        [client]
        name = "bob"
        host = "10.0.0.1"
        port = 9000
        retry_max_attempts = 3

        [broker]
        port = 9700
    "#;
    fs::write(&path, toml).expect("write config file");

    let cfg = load_config_from(path.to_str().unwrap()).expect("load_config failed");
    assert_eq!(cfg.client.name, "bob");
    assert_eq!(cfg.client.host, "10.0.0.1");
    assert_eq!(cfg.client.port, 9000);
    assert_eq!(cfg.client.retry_max_attempts, Some(3));
    // Untouched values keep their defaults.
    assert_eq!(cfg.client.poll_interval_ms, 50);
    assert_eq!(cfg.broker.host, "127.0.0.1");
    assert_eq!(cfg.broker.port, 9700);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = tmp.path().join("client.toml");
    fs::write(&path, "[client]\nport = 9000\n").expect("write config file");

    temp_env::with_vars(
        [
            ("MQ_CLIENT__PORT", Some("9100")),
            ("MQ_CLIENT__HOST", Some("broker.local")),
        ],
        || {
            let cfg = load_config_from(path.to_str().unwrap()).expect("load_config failed");
            assert_eq!(cfg.client.port, 9100);
            assert_eq!(cfg.client.host, "broker.local");
        },
    );
}

#[test]
#[serial]
fn test_missing_file_yields_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = tmp.path().join("absent");
    let cfg = load_config_from(path.to_str().unwrap()).expect("load_config failed");
    assert_eq!(cfg.client.port, 9620);
    assert_eq!(cfg.broker.port, 9620);
}
