use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use thiserror::Error;
use url::Url;

use learnhub_core::application::ApiSettings;
use learnhub_core::security::RateLimitRule;

use crate::constants::{
    DEFAULT_DB_ACQUIRE_TIMEOUT, DEFAULT_DB_MAX_CONNECTIONS,
    DEFAULT_DB_MIN_CONNECTIONS, DEFAULT_LOCAL_STATE_PATH,
    DEFAULT_PASSWORD_PEPPER,
};
use crate::models::{
    AuthConfig, Config, ConfigMetadata, DatabaseConfig, LocalStateConfig,
    RateLimitsConfig, RestConfig, SearchConfig, SessionConfig, StoreBackend,
};
use crate::sources::{self, EnvConfig, FileConfig};
use crate::validation::{self, ConfigGuardRailError, ConfigWarnings};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("learnhub.toml"),
        PathBuf::from("config/learnhub.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

/// A validated configuration plus anything worth telling the operator.
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file not found at {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid {setting}: {source}")]
    InvalidUrl {
        setting: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid value '{value}' for {setting}: {reason}")]
    InvalidValue {
        setting: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Default)]
struct ConfigPathSource {
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    default: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathProvenance {
    Explicit,
    Env,
    Default,
}

impl ConfigPathProvenance {
    fn is_explicit(self) -> bool {
        matches!(self, Self::Explicit | Self::Env)
    }
}

impl ConfigPathSource {
    fn is_empty(&self) -> bool {
        self.explicit.is_none() && self.env.is_none()
    }

    fn resolved_path(self) -> Option<(PathBuf, ConfigPathProvenance)> {
        self.explicit
            .map(|path| (path, ConfigPathProvenance::Explicit))
            .or_else(|| self.env.map(|path| (path, ConfigPathProvenance::Env)))
            .or_else(|| {
                self.default.map(|path| (path, ConfigPathProvenance::Default))
            })
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Seeds the process environment from the `.env` file (if any), then
    /// layers environment over file over defaults.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        self.load_with_env(EnvConfig::gather(), env_file_loaded)
    }

    /// Same as [`ConfigLoader::load`] but with an explicit environment layer.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            compose_config(file_config, env, config_path, env_file_loaded)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let mut source = ConfigPathSource::default();

        if let Some(explicit) = &self.options.config_path {
            source.explicit = Some(explicit.clone());
        } else if let Some(from_env) = &env_config.config_path {
            source.env = Some(from_env.clone());
        }

        if source.is_empty() {
            source.default = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
                .cloned();
        }

        let Some((path, provenance)) = source.resolved_path() else {
            return Ok((None, None));
        };

        if !path.exists() {
            if provenance.is_explicit() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let file_config = read_file_config(&path)?;
        tracing::debug!(path = %path.display(), ?provenance, "loaded config file");
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
    toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file_config.is_none() {
        warnings.push_with_hint(
            "No learnhub.toml detected; falling back to environment variables",
            "Create learnhub.toml or pass --config to pin settings",
        );
    }

    let FileConfig {
        store: file_store,
        database: file_database,
        rest: file_rest,
        auth: file_auth,
        session: file_session,
        rate_limits: file_rate_limits,
        search: file_search,
        local_state: file_local_state,
    } = file_config.unwrap_or_default();

    let store = match env.store.clone() {
        Some(raw) => parse_value(sources::ENV_STORE, &raw)?,
        None => match file_store {
            Some(raw) => parse_value("store", &raw)?,
            None => StoreBackend::default(),
        },
    };

    let database = DatabaseConfig {
        url: env.database_url.clone().or(file_database.url),
        max_connections: layered(
            sources::ENV_DB_MAX_CONNECTIONS,
            env.db_max_connections.as_deref(),
            file_database.max_connections,
        )?
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
        min_connections: layered(
            sources::ENV_DB_MIN_CONNECTIONS,
            env.db_min_connections.as_deref(),
            file_database.min_connections,
        )?
        .unwrap_or(DEFAULT_DB_MIN_CONNECTIONS),
        acquire_timeout: layered_duration(
            sources::ENV_DB_ACQUIRE_TIMEOUT,
            env.db_acquire_timeout.as_deref(),
            file_database.acquire_timeout.as_deref(),
        )?
        .unwrap_or(DEFAULT_DB_ACQUIRE_TIMEOUT),
    };
    if let Some(url) = &database.url {
        Url::parse(url).map_err(|source| ConfigLoadError::InvalidUrl {
            setting: sources::ENV_DATABASE_URL,
            source,
        })?;
    }

    let rest = match env.rest_url.clone().or(file_rest.url) {
        Some(raw) => Some(RestConfig {
            base_url: parse_rest_url(&raw)?,
            api_key: env.rest_api_key.clone().or(file_rest.api_key),
            timeout: layered_duration(
                sources::ENV_REST_TIMEOUT,
                env.rest_timeout.as_deref(),
                file_rest.timeout.as_deref(),
            )?,
        }),
        None => None,
    };

    let auth = AuthConfig {
        password_pepper: env
            .password_pepper
            .clone()
            .or(file_auth.password_pepper)
            .unwrap_or_else(|| DEFAULT_PASSWORD_PEPPER.to_string()),
        streak_offset_minutes: layered(
            sources::ENV_STREAK_OFFSET,
            env.streak_offset_minutes.as_deref(),
            file_auth.streak_offset_minutes,
        )?
        .unwrap_or(0),
    };

    let session_defaults = SessionConfig::default();
    let session = SessionConfig {
        timeout: layered_duration(
            sources::ENV_SESSION_TIMEOUT,
            env.session_timeout.as_deref(),
            file_session.timeout.as_deref(),
        )?
        .unwrap_or(session_defaults.timeout),
        warning_window: layered_duration(
            sources::ENV_SESSION_WARNING,
            env.session_warning.as_deref(),
            file_session.warning_window.as_deref(),
        )?
        .unwrap_or(session_defaults.warning_window),
        logout_delay: layered_duration(
            sources::ENV_LOGOUT_DELAY,
            env.logout_delay.as_deref(),
            file_session.logout_delay.as_deref(),
        )?
        .unwrap_or(session_defaults.logout_delay),
    };

    let limit_defaults = RateLimitsConfig::default();
    let rate_limits = RateLimitsConfig {
        login: layered_rule(
            sources::ENV_LOGIN_LIMIT,
            env.login_limit.as_deref(),
            file_rate_limits.login.as_deref(),
        )?
        .unwrap_or(limit_defaults.login),
        registration: layered_rule(
            sources::ENV_REGISTRATION_LIMIT,
            env.registration_limit.as_deref(),
            file_rate_limits.registration.as_deref(),
        )?
        .unwrap_or(limit_defaults.registration),
        form_submit: layered_rule(
            "rate_limits.form_submit",
            None,
            file_rate_limits.form_submit.as_deref(),
        )?
        .unwrap_or(limit_defaults.form_submit),
    };

    let search = SearchConfig {
        default_page_size: layered(
            sources::ENV_PAGE_SIZE,
            env.page_size.as_deref(),
            file_search.default_page_size,
        )?
        .unwrap_or(ApiSettings::default().default_page_size),
    };

    let local_state = LocalStateConfig {
        path: env
            .local_state
            .clone()
            .or(file_local_state.path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_STATE_PATH)),
    };

    let config = Config {
        store,
        database,
        rest,
        auth,
        session,
        rate_limits,
        search,
        local_state,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
        },
    };

    validation::apply_guard_rails(&config, &mut warnings)?;

    Ok((config, warnings))
}

fn parse_value<T>(setting: &'static str, raw: &str) -> Result<T, ConfigLoadError>
where
    T: FromStr,
    T::Err: ToString,
{
    raw.trim()
        .parse::<T>()
        .map_err(|err| ConfigLoadError::InvalidValue {
            setting,
            value: raw.to_string(),
            reason: err.to_string(),
        })
}

/// Environment string wins over the typed file value.
fn layered<T>(
    setting: &'static str,
    env: Option<&str>,
    file: Option<T>,
) -> Result<Option<T>, ConfigLoadError>
where
    T: FromStr,
    T::Err: ToString,
{
    env.map(|raw| parse_value(setting, raw)).transpose().map(|v| v.or(file))
}

fn layered_duration(
    setting: &'static str,
    env: Option<&str>,
    file: Option<&str>,
) -> Result<Option<Duration>, ConfigLoadError> {
    env.or(file)
        .map(|raw| {
            humantime::parse_duration(raw.trim()).map_err(|err| {
                ConfigLoadError::InvalidValue {
                    setting,
                    value: raw.to_string(),
                    reason: err.to_string(),
                }
            })
        })
        .transpose()
}

fn layered_rule(
    setting: &'static str,
    env: Option<&str>,
    file: Option<&str>,
) -> Result<Option<RateLimitRule>, ConfigLoadError> {
    env.or(file)
        .map(|raw| {
            parse_rule(raw).map_err(|reason| ConfigLoadError::InvalidValue {
                setting,
                value: raw.to_string(),
                reason,
            })
        })
        .transpose()
}

/// Parses `"<requests>/<window>"`, e.g. `"5/60s"` or `"3/1h"`.
fn parse_rule(raw: &str) -> Result<RateLimitRule, String> {
    let (count, window) = raw
        .trim()
        .split_once('/')
        .ok_or_else(|| "expected <requests>/<window>".to_string())?;
    let max_requests = count
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("request count: {err}"))?;
    let window = humantime::parse_duration(window.trim())
        .map_err(|err| format!("window: {err}"))?;
    Ok(RateLimitRule::new(max_requests, window))
}

/// Relative table paths are joined onto the base, so it needs a trailing
/// slash.
fn parse_rest_url(raw: &str) -> Result<Url, ConfigLoadError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|source| ConfigLoadError::InvalidUrl {
        setting: sources::ENV_REST_URL,
        source,
    })
}
