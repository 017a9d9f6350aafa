use std::fmt;

use thiserror::Error;

use crate::constants::{DEFAULT_PASSWORD_PEPPER, MAX_STREAK_OFFSET_MINUTES};
use crate::models::{Config, StoreBackend};

/// Non-fatal finding attached to a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{} (hint: {hint})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }

    /// Emits every warning through `tracing`.
    pub fn log(&self) {
        for warning in &self.items {
            match &warning.hint {
                Some(hint) => {
                    tracing::warn!(message = %warning.message, hint = %hint, "configuration warning")
                }
                None => {
                    tracing::warn!(message = %warning.message, "configuration warning")
                }
            }
        }
    }
}

/// Combinations that are rejected outright.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("store backend '{backend}' requires {setting} to be set")]
    MissingBackendSetting {
        backend: StoreBackend,
        setting: &'static str,
    },
    #[error(
        "session warning window ({warning:?}) must be shorter than the timeout ({timeout:?})"
    )]
    WarningWindowTooLong {
        warning: std::time::Duration,
        timeout: std::time::Duration,
    },
    #[error("search.default_page_size must be at least 1")]
    ZeroPageSize,
    #[error("rate limit '{name}' must allow at least one request over a non-zero window")]
    DegenerateRateLimit { name: &'static str },
    #[error(
        "auth.streak_offset_minutes must be within +/-{} minutes, got {minutes}",
        MAX_STREAK_OFFSET_MINUTES - 1
    )]
    StreakOffsetOutOfRange { minutes: i32 },
    #[error("database pool min_connections ({min}) exceeds max_connections ({max})")]
    PoolBounds { min: u32, max: u32 },
}

/// Rejects invalid combinations and records warnings for risky ones.
pub fn apply_guard_rails(
    config: &Config,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    match config.store {
        StoreBackend::Memory => {}
        StoreBackend::Postgres => {
            if config.database.url.is_none() {
                return Err(ConfigGuardRailError::MissingBackendSetting {
                    backend: config.store,
                    setting: "DATABASE_URL",
                });
            }
            if config.database.min_connections > config.database.max_connections {
                return Err(ConfigGuardRailError::PoolBounds {
                    min: config.database.min_connections,
                    max: config.database.max_connections,
                });
            }
        }
        StoreBackend::Rest => match &config.rest {
            None => {
                return Err(ConfigGuardRailError::MissingBackendSetting {
                    backend: config.store,
                    setting: "LEARNHUB_REST_URL",
                });
            }
            Some(rest) if rest.api_key.is_none() => warnings.push_with_hint(
                "REST store configured without an API key",
                "set LEARNHUB_REST_API_KEY unless the endpoint is open",
            ),
            Some(_) => {}
        },
    }

    let session = &config.session;
    if session.warning_window >= session.timeout {
        return Err(ConfigGuardRailError::WarningWindowTooLong {
            warning: session.warning_window,
            timeout: session.timeout,
        });
    }

    if config.search.default_page_size == 0 {
        return Err(ConfigGuardRailError::ZeroPageSize);
    }

    let limits = &config.rate_limits;
    for (name, rule) in [
        ("login", limits.login),
        ("registration", limits.registration),
        ("form_submit", limits.form_submit),
    ] {
        if rule.max_requests == 0 || rule.window.is_zero() {
            return Err(ConfigGuardRailError::DegenerateRateLimit { name });
        }
    }

    let minutes = config.auth.streak_offset_minutes;
    if minutes.unsigned_abs() >= MAX_STREAK_OFFSET_MINUTES.unsigned_abs() {
        return Err(ConfigGuardRailError::StreakOffsetOutOfRange { minutes });
    }

    if config.auth.password_pepper == DEFAULT_PASSWORD_PEPPER {
        warnings.push_with_hint(
            "using the built-in development password pepper",
            "set LEARNHUB_PASSWORD_PEPPER before storing real credentials",
        );
    }

    Ok(())
}
