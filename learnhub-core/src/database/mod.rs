//! Store boundary: repository ports and their adapters.

pub mod infrastructure;
pub mod ports;

use crate::error::StoreError;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub use infrastructure::memory::MemoryStore;
#[cfg(feature = "database")]
pub use infrastructure::postgres::{PgPoolSettings, PostgresStore};
#[cfg(feature = "rest")]
pub use infrastructure::rest::{RestStore, RestStoreConfig};
pub use ports::{
    courses::{CourseSearchRows, CoursesRepository},
    users::{LoginRecord, UsersRepository},
};
