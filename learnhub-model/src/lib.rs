//! Core data model definitions shared across LearnHub crates.
#![allow(missing_docs)]

pub mod course;
pub mod enrollment;
pub mod error;
pub mod ids;
pub mod role;
pub mod user;
pub mod wishlist;

// Intentionally curated re-exports for downstream consumers.
pub use course::{Course, NewCourse};
pub use enrollment::{Enrollment, Enrollments, ProgressPercent};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{CourseId, LessonId, UserKey};
pub use role::UserRole;
pub use user::{NewUser, StreakState, UserRecord};
pub use wishlist::Wishlist;
