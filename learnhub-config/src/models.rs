use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use learnhub_core::application::ApiSettings;
use learnhub_core::database::{PgPoolSettings, RestStoreConfig};
use learnhub_core::domain::users::SessionSettings;
use learnhub_core::domain::users::auth::StreakCalendar;
use learnhub_core::security::RateLimitRule;
use serde::{Deserialize, Serialize};
use url::Url;

/// Which store adapter the services run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
    Rest,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Postgres => "postgres",
            StoreBackend::Rest => "rest",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "rest" | "postgrest" => Ok(StoreBackend::Rest),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn pool_settings(&self) -> PgPoolSettings {
        PgPoolSettings {
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            acquire_timeout: self.acquire_timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl RestConfig {
    pub fn store_config(&self) -> RestStoreConfig {
        RestStoreConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.timeout,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub password_pepper: String,
    /// Offset east of UTC at which streak calendar days are evaluated.
    pub streak_offset_minutes: i32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("password_pepper", &"<redacted>")
            .field("streak_offset_minutes", &self.streak_offset_minutes)
            .finish()
    }
}

impl AuthConfig {
    /// `None` when the offset is out of range; guard rails reject that
    /// before a [`Config`] is handed out.
    pub fn calendar(&self) -> Option<StreakCalendar> {
        StreakCalendar::from_offset_seconds(self.streak_offset_minutes.checked_mul(60)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub timeout: Duration,
    pub warning_window: Duration,
    pub logout_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let defaults = SessionSettings::default();
        Self {
            timeout: defaults.timeout,
            warning_window: defaults.warning_window,
            logout_delay: defaults.logout_delay,
        }
    }
}

impl SessionConfig {
    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            timeout: self.timeout,
            warning_window: self.warning_window,
            logout_delay: self.logout_delay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitsConfig {
    pub login: RateLimitRule,
    pub registration: RateLimitRule,
    pub form_submit: RateLimitRule,
}

impl Default for RateLimitsConfig {
    fn default() -> Self {
        Self {
            login: RateLimitRule::LOGIN,
            registration: RateLimitRule::REGISTRATION,
            form_submit: RateLimitRule::FORM_SUBMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub default_page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStateConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreBackend,
    pub database: DatabaseConfig,
    pub rest: Option<RestConfig>,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub rate_limits: RateLimitsConfig,
    pub search: SearchConfig,
    pub local_state: LocalStateConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            default_page_size: self.search.default_page_size,
            calendar: self.auth.calendar().unwrap_or_default(),
            login_limit: self.rate_limits.login,
            registration_limit: self.rate_limits.registration,
        }
    }
}
