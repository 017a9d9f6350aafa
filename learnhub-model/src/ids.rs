use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Store-assigned key of a user row.
///
/// Distinct from the human-facing login identifier (`user_id` on the wire),
/// which lives on [`crate::UserRecord::login_id`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserKey(pub Uuid);

impl Default for UserKey {
    fn default() -> Self {
        Self::new()
    }
}

impl UserKey {
    pub fn new() -> Self {
        UserKey(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for UserKey {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(UserKey)
            .map_err(|err| ModelError::InvalidId(format!("user key {s:?}: {err}")))
    }
}

/// Primary key of a course row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CourseId(pub Uuid);

impl Default for CourseId {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseId {
    pub fn new() -> Self {
        CourseId(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for CourseId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(CourseId).map_err(|err| {
            ModelError::InvalidId(format!("course id {s:?}: {err}"))
        })
    }
}

/// Identifier of a lesson inside a course.
///
/// Lesson ids are opaque strings chosen by course authors. They are trimmed
/// on construction and must be non-empty and at most
/// [`LessonId::MAX_LEN`] characters.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    pub const MAX_LEN: usize = 128;

    pub fn new(raw: impl AsRef<str>) -> Result<Self, ModelError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidLessonId(
                "lesson id cannot be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(ModelError::InvalidLessonId(format!(
                "lesson id exceeds {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(LessonId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for LessonId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
