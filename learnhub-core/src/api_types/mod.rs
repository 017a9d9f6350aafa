//! Error kinds, the success/error envelope and store error normalization
//! shared by every public entry point.

pub mod messages;
pub mod responses;

pub use messages::user_friendly_message;
pub use responses::{
    AnalyticsSummary, ApiError, ApiResult, CourseCreated, CourseList,
    EnrolledCourse, Envelope, ErrorKind, LoginSuccess, ProgressSnapshot,
    ProgressUpdated, UserCreated,
};
