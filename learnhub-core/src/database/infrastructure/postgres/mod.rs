mod courses;
mod users;

use std::fmt;
use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::error::StoreError;

/// Connection pool sizing for [`PostgresStore::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgPoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PgPoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// `users` / `courses` tables in PostgreSQL, enrollments and wishlists
/// stored as JSONB columns.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresStore")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(
        url: &str,
        settings: PgPoolSettings,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .test_before_acquire(true)
            .connect(url)
            .await
            .map_err(map_sqlx_error)?;

        info!(
            max_connections = settings.max_connections,
            min_connections = settings.min_connections,
            "database pool initialized"
        );

        Ok(Self { pool })
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|err| {
            StoreError::backend(
                INTERNAL_SQLSTATE,
                format!("Failed to run migrations: {err}"),
            )
        })?;
        info!("database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// SQLSTATE `internal_error`, used for failures without a server code.
const INTERNAL_SQLSTATE: &str = "XX000";

pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NoRows,
        sqlx::Error::Database(db) => StoreError::backend(
            db.code()
                .map(|code| code.into_owned())
                .unwrap_or_else(|| INTERNAL_SQLSTATE.to_string()),
            db.message(),
        ),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Network(err.to_string()),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => {
            StoreError::Decode(err.to_string())
        }
        other => StoreError::backend(INTERNAL_SQLSTATE, other.to_string()),
    }
}

pub(crate) fn rows_touched(affected: u64) -> Result<(), StoreError> {
    if affected == 0 {
        Err(StoreError::NoRows)
    } else {
        Ok(())
    }
}
