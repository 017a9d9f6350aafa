use std::fs;
use std::time::Duration;

use learnhub_config::sources::EnvConfig;
use learnhub_config::{
    ConfigGuardRailError, ConfigLoadError, ConfigLoader, StoreBackend,
};
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("learnhub.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn explicit_path_must_exist() {
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn defaults_apply_without_a_file() {
    // The crate directory carries no learnhub.toml.
    let load = ConfigLoader::new()
        .load_with_env(EnvConfig::default(), false)
        .unwrap();
    let config = load.config;

    assert_eq!(config.store, StoreBackend::Memory);
    assert_eq!(config.search.default_page_size, 12);
    assert_eq!(config.session.timeout, Duration::from_secs(30 * 60));
    assert_eq!(config.session.warning_window, Duration::from_secs(5 * 60));
    assert!(config.metadata.config_path.is_none());
    assert_eq!(load.warnings.len(), 2);
}

#[test]
fn file_values_are_layered_under_the_environment() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        store = "rest"

        [rest]
        url = "https://project.example.co/rest/v1"
        api_key = "anon-key"
        timeout = "5s"

        [auth]
        password_pepper = "file-pepper"
        streak_offset_minutes = 120

        [session]
        timeout = "20m"
        warning_window = "2m"

        [rate_limits]
        login = "3/30s"

        [search]
        default_page_size = 24
        "#,
    );

    let env = EnvConfig {
        password_pepper: Some("env-pepper".into()),
        ..EnvConfig::default()
    };
    let load = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(env, false)
        .unwrap();
    let config = load.config;

    assert_eq!(config.store, StoreBackend::Rest);
    let rest = config.rest.as_ref().unwrap();
    assert_eq!(rest.base_url.as_str(), "https://project.example.co/rest/v1/");
    assert_eq!(rest.timeout, Some(Duration::from_secs(5)));
    assert_eq!(config.auth.password_pepper, "env-pepper");
    assert_eq!(config.session.timeout, Duration::from_secs(20 * 60));
    assert_eq!(config.session.warning_window, Duration::from_secs(120));
    assert_eq!(config.session.logout_delay, Duration::from_secs(1));
    assert_eq!(config.rate_limits.login.max_requests, 3);
    assert_eq!(config.rate_limits.login.window, Duration::from_secs(30));
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));

    let settings = config.api_settings();
    assert_eq!(settings.default_page_size, 24);
    assert_eq!(settings.calendar.offset().local_minus_utc(), 7200);
    assert!(load.warnings.is_empty());
}

#[test]
fn postgres_without_a_url_is_rejected() {
    let env = EnvConfig {
        store: Some("postgres".into()),
        ..EnvConfig::default()
    };
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(env, false)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::MissingBackendSetting {
            backend: StoreBackend::Postgres,
            ..
        })
    ));
}

#[test]
fn warning_window_must_be_shorter_than_the_timeout() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [session]
        timeout = "5m"
        warning_window = "5m"
        "#,
    );

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::WarningWindowTooLong { .. })
    ));
}

#[test]
fn bad_values_name_the_setting() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");
    let env = EnvConfig {
        session_timeout: Some("soon".into()),
        ..EnvConfig::default()
    };

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(env, false)
        .unwrap_err();
    match err {
        ConfigLoadError::InvalidValue { setting, value, .. } => {
            assert_eq!(setting, "LEARNHUB_SESSION_TIMEOUT");
            assert_eq!(value, "soon");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_toml_reports_the_path() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "store = [");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));
    assert!(err.to_string().contains("learnhub.toml"));
}

#[test]
fn risky_settings_produce_warnings() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        store = "rest"

        [rest]
        url = "https://project.example.co/rest/v1/"
        "#,
    );

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default(), false)
        .unwrap();

    let messages: Vec<_> =
        load.warnings.iter().map(|w| w.message.as_str()).collect();
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().any(|m| m.contains("API key")));
    assert!(messages.iter().any(|m| m.contains("pepper")));
}
