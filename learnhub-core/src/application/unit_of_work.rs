use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::MemoryStore;
#[cfg(feature = "database")]
use crate::database::PostgresStore;
#[cfg(feature = "rest")]
use crate::database::RestStore;
use crate::database::ports::{courses::CoursesRepository, users::UsersRepository};

/// Repository ports used by the domain services.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub users: Arc<dyn UsersRepository>,
    pub courses: Arc<dyn CoursesRepository>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("users", &type_name_of_val(self.users.as_ref()))
            .field("courses", &type_name_of_val(self.courses.as_ref()))
            .finish()
    }
}

impl AppUnitOfWork {
    pub fn builder() -> AppUnitOfWorkBuilder {
        AppUnitOfWorkBuilder::new()
    }

    /// Both ports backed by one in-process store.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            courses: store,
        }
    }

    #[cfg(feature = "database")]
    pub fn from_postgres(store: PostgresStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            courses: store,
        }
    }

    #[cfg(feature = "rest")]
    pub fn from_rest(store: RestStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            courses: store,
        }
    }
}

#[derive(Default)]
pub struct AppUnitOfWorkBuilder {
    users: Option<Arc<dyn UsersRepository>>,
    courses: Option<Arc<dyn CoursesRepository>>,
}

impl fmt::Debug for AppUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWorkBuilder")
            .field("users", &self.users.is_some())
            .field("courses", &self.courses.is_some())
            .finish()
    }
}

impl AppUnitOfWorkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, repo: Arc<dyn UsersRepository>) -> Self {
        self.users = Some(repo);
        self
    }

    pub fn with_courses(mut self, repo: Arc<dyn CoursesRepository>) -> Self {
        self.courses = Some(repo);
        self
    }

    /// Fails naming the first missing port.
    pub fn build(self) -> Result<AppUnitOfWork, String> {
        Ok(AppUnitOfWork {
            users: self
                .users
                .ok_or_else(|| "missing UsersRepository".to_string())?,
            courses: self
                .courses
                .ok_or_else(|| "missing CoursesRepository".to_string())?,
        })
    }
}
