use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Shape of `learnhub.toml`. Every field is optional so a partial file only
/// overrides what it names.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileConfig {
    pub store: Option<String>,
    pub database: FileDatabaseConfig,
    pub rest: FileRestConfig,
    pub auth: FileAuthConfig,
    pub session: FileSessionConfig,
    pub rate_limits: FileRateLimitsConfig,
    pub search: FileSearchConfig,
    pub local_state: FileLocalStateConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_connections: Option<u32>,
    /// Humantime duration, e.g. `"30s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquire_timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileRestConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_pepper: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileSessionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_window: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logout_delay: Option<String>,
}

/// Limits are written as `"<requests>/<window>"`, e.g. `"5/60s"`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileRateLimitsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_submit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileSearchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileLocalStateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Raw values read from the process environment. Parsing into typed values
/// happens in the loader so failures can name the variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub store: Option<String>,
    pub database_url: Option<String>,
    pub db_max_connections: Option<String>,
    pub db_min_connections: Option<String>,
    pub db_acquire_timeout: Option<String>,
    pub rest_url: Option<String>,
    pub rest_api_key: Option<String>,
    pub rest_timeout: Option<String>,
    pub password_pepper: Option<String>,
    pub streak_offset_minutes: Option<String>,
    pub session_timeout: Option<String>,
    pub session_warning: Option<String>,
    pub logout_delay: Option<String>,
    pub login_limit: Option<String>,
    pub registration_limit: Option<String>,
    pub page_size: Option<String>,
    pub local_state: Option<PathBuf>,
}

pub const ENV_CONFIG_PATH: &str = "LEARNHUB_CONFIG";
pub const ENV_STORE: &str = "LEARNHUB_STORE";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_DB_MAX_CONNECTIONS: &str = "LEARNHUB_DB_MAX_CONNECTIONS";
pub const ENV_DB_MIN_CONNECTIONS: &str = "LEARNHUB_DB_MIN_CONNECTIONS";
pub const ENV_DB_ACQUIRE_TIMEOUT: &str = "LEARNHUB_DB_ACQUIRE_TIMEOUT";
pub const ENV_REST_URL: &str = "LEARNHUB_REST_URL";
pub const ENV_REST_API_KEY: &str = "LEARNHUB_REST_API_KEY";
pub const ENV_REST_TIMEOUT: &str = "LEARNHUB_REST_TIMEOUT";
pub const ENV_PASSWORD_PEPPER: &str = "LEARNHUB_PASSWORD_PEPPER";
pub const ENV_STREAK_OFFSET: &str = "LEARNHUB_STREAK_OFFSET_MINUTES";
pub const ENV_SESSION_TIMEOUT: &str = "LEARNHUB_SESSION_TIMEOUT";
pub const ENV_SESSION_WARNING: &str = "LEARNHUB_SESSION_WARNING";
pub const ENV_LOGOUT_DELAY: &str = "LEARNHUB_LOGOUT_DELAY";
pub const ENV_LOGIN_LIMIT: &str = "LEARNHUB_LOGIN_LIMIT";
pub const ENV_REGISTRATION_LIMIT: &str = "LEARNHUB_REGISTRATION_LIMIT";
pub const ENV_PAGE_SIZE: &str = "LEARNHUB_PAGE_SIZE";
pub const ENV_LOCAL_STATE: &str = "LEARNHUB_LOCAL_STATE";

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the environment layer from an arbitrary lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            config_path: var(ENV_CONFIG_PATH).map(PathBuf::from),
            store: var(ENV_STORE),
            database_url: var(ENV_DATABASE_URL),
            db_max_connections: var(ENV_DB_MAX_CONNECTIONS),
            db_min_connections: var(ENV_DB_MIN_CONNECTIONS),
            db_acquire_timeout: var(ENV_DB_ACQUIRE_TIMEOUT),
            rest_url: var(ENV_REST_URL),
            rest_api_key: var(ENV_REST_API_KEY),
            rest_timeout: var(ENV_REST_TIMEOUT),
            password_pepper: var(ENV_PASSWORD_PEPPER),
            streak_offset_minutes: var(ENV_STREAK_OFFSET),
            session_timeout: var(ENV_SESSION_TIMEOUT),
            session_warning: var(ENV_SESSION_WARNING),
            logout_delay: var(ENV_LOGOUT_DELAY),
            login_limit: var(ENV_LOGIN_LIMIT),
            registration_limit: var(ENV_REGISTRATION_LIMIT),
            page_size: var(ENV_PAGE_SIZE),
            local_state: var(ENV_LOCAL_STATE).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn blank_env_values_are_unset() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_STORE, "postgres"),
            (ENV_DATABASE_URL, "   "),
            (ENV_PAGE_SIZE, " 20 "),
        ]);
        let env = EnvConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(env.store.as_deref(), Some("postgres"));
        assert_eq!(env.database_url, None);
        assert_eq!(env.page_size.as_deref(), Some("20"));
    }

    #[test]
    fn partial_file_parses() {
        let file: FileConfig = toml::from_str(
            r#"
            store = "rest"

            [rest]
            url = "https://project.example.co/rest/v1/"

            [session]
            timeout = "20m"
            "#,
        )
        .unwrap();

        assert_eq!(file.store.as_deref(), Some("rest"));
        assert_eq!(file.session.timeout.as_deref(), Some("20m"));
        assert_eq!(file.session.warning_window, None);
        assert_eq!(file.database, FileDatabaseConfig::default());
    }
}
