use chrono::{DateTime, Utc};
use learnhub_model::{Course, LessonId, UserRecord};
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::api_types::messages::{self, user_friendly_message};
use crate::domain::analytics::StudentAnalytics;
use crate::error::LearnError;

/// Category of a failed call, matching how callers are expected to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed input, detected before any store call
    Validation,
    /// Store failure, already normalized to a user-facing message
    Store,
    /// Another update for the same guard key is in flight
    Contention,
    Unauthorized,
    RateLimited,
    Internal,
}

/// Normalized failure returned by every public entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal, messages::FALLBACK)
    }

    /// Converts a service error into its user-facing form, logging the raw
    /// failure under `context`.
    pub fn from_learn(err: LearnError, context: &str) -> Self {
        match err {
            LearnError::Validation(message) => Self::validation(message),
            LearnError::Store(store) => {
                tracing::error!(
                    context,
                    code = store.code().unwrap_or("-"),
                    error = %store,
                    "store call failed"
                );
                let raw = store.message();
                Self::new(
                    ErrorKind::Store,
                    user_friendly_message(store.code(), Some(raw.as_str())),
                )
            }
            LearnError::Contention { key } => {
                tracing::debug!(context, %key, "update rejected by guard");
                Self::new(ErrorKind::Contention, "Update in progress")
            }
            LearnError::InvalidCredentials => {
                Self::unauthorized("Invalid credentials")
            }
            err @ LearnError::RateLimited { .. } => {
                Self::new(ErrorKind::RateLimited, err.to_string())
            }
            LearnError::Crypto(err) => {
                tracing::error!(context, error = %err, "credential check failed");
                Self::internal()
            }
            LearnError::Internal(message) => {
                tracing::error!(context, error = %message, "internal failure");
                Self::internal()
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl Serialize for ApiError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("success", &false)?;
        map.serialize_entry("error", &self.message)?;
        map.serialize_entry("kind", &self.kind)?;
        map.end()
    }
}

/// Uniform `{success, ...}` wrapper around an [`ApiResult`].
///
/// Object payloads are merged into the top level, `()` adds nothing, and
/// any other payload lands under `data`.
#[derive(Debug)]
pub struct Envelope<'a, T>(pub &'a ApiResult<T>);

impl<T: Serialize> Envelope<'_, T> {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to encode envelope");
            serde_json::json!({
                "success": false,
                "error": messages::FALLBACK,
                "kind": ErrorKind::Internal,
            })
        })
    }
}

impl<T: Serialize> Serialize for Envelope<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let payload = match self.0 {
            Err(err) => return err.serialize(serializer),
            Ok(payload) => serde_json::to_value(payload).map_err(S::Error::custom)?,
        };

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("success", &true)?;
        match payload {
            Value::Object(fields) => {
                for (key, value) in fields {
                    map.serialize_entry(&key, &value)?;
                }
            }
            Value::Null => {}
            other => map.serialize_entry("data", &other)?,
        }
        map.end()
    }
}

// ===== Payloads =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdated {
    /// The clamped value that was persisted.
    pub progress: u8,
}

/// Read-only projection of one enrollment. Zeroed when absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub progress: u8,
    pub completed_lessons: Vec<LessonId>,
    pub last_accessed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseList<T = Course> {
    pub courses: Vec<T>,
}

/// A course merged with the caller's enrollment state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolledCourse {
    #[serde(flatten)]
    pub course: Course,
    pub progress: u8,
    pub last_accessed: Option<DateTime<Utc>>,
    pub completed_lessons: Vec<LessonId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub analytics: StudentAnalytics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSuccess {
    pub user: UserRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreated {
    pub user: UserRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCreated {
    pub course: Course,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn store_errors_are_normalized() {
        let err = ApiError::from_learn(
            LearnError::Store(StoreError::backend("23505", "duplicate key")),
            "test",
        );
        assert_eq!(err.kind, ErrorKind::Store);
        assert_eq!(err.message, messages::RECORD_EXISTS);

        let err = ApiError::from_learn(
            LearnError::Store(StoreError::Decode("bad json".into())),
            "test",
        );
        assert_eq!(err.message, messages::FALLBACK);
    }

    #[test]
    fn internal_details_never_reach_the_message() {
        let err = ApiError::from_learn(
            LearnError::Internal("pool exhausted at 10.0.0.3".into()),
            "test",
        );
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.message, messages::FALLBACK);
    }

    #[test]
    fn envelope_merges_object_payloads() {
        let ok: ApiResult<ProgressUpdated> = Ok(ProgressUpdated { progress: 40 });
        assert_eq!(
            Envelope(&ok).to_value(),
            serde_json::json!({ "success": true, "progress": 40 })
        );

        let unit: ApiResult<()> = Ok(());
        assert_eq!(
            Envelope(&unit).to_value(),
            serde_json::json!({ "success": true })
        );

        let failed: ApiResult<()> =
            Err(ApiError::new(ErrorKind::Contention, "Update in progress"));
        assert_eq!(
            Envelope(&failed).to_value(),
            serde_json::json!({
                "success": false,
                "error": "Update in progress",
                "kind": "contention",
            })
        );
    }
}
