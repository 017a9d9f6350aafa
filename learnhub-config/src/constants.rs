use std::time::Duration;

/// Pepper used when none is configured. Only acceptable for local use.
pub const DEFAULT_PASSWORD_PEPPER: &str = "learnhub-development-pepper";

pub const DEFAULT_LOCAL_STATE_PATH: &str = ".learnhub/local-state.json";

pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest accepted streak offset, exclusive, in minutes.
pub const MAX_STREAK_OFFSET_MINUTES: i32 = 24 * 60;
