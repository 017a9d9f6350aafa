use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::CourseId;

/// A course row as returned by the store.
///
/// Read-only from the services' point of view; only the CLI seeding path
/// inserts new rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Search only returns rows with this flag set.
    #[serde(default)]
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub category: String,
    pub is_visible: bool,
}

impl NewCourse {
    pub fn into_course(self, id: CourseId, created_at: DateTime<Utc>) -> Course {
        Course {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            is_visible: self.is_visible,
            created_at,
        }
    }
}
