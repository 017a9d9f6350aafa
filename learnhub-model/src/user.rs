use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    enrollment::Enrollments, ids::UserKey, role::UserRole, wishlist::Wishlist,
};

/// A user row without its credential column.
///
/// The stored password hash never leaves the repository layer except
/// through the login lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserKey,
    /// Human-facing login identifier.
    #[serde(rename = "user_id")]
    pub login_id: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub enrolled_courses: Enrollments,
    #[serde(default)]
    pub wishlist: Wishlist,
}

impl UserRecord {
    pub fn streak(&self) -> StreakState {
        StreakState {
            last_login: self.last_login,
            current: self.current_streak,
            longest: self.longest_streak,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub login_id: String,
    pub role: UserRole,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl NewUser {
    pub fn into_record(self, id: UserKey) -> UserRecord {
        UserRecord {
            id,
            login_id: self.login_id,
            role: self.role,
            full_name: self.full_name,
            email: self.email,
            last_login: None,
            current_streak: 0,
            longest_streak: 0,
            enrolled_courses: Enrollments::new(),
            wishlist: Wishlist::new(),
        }
    }
}

/// Login streak triple persisted on the user row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub struct StreakState {
    pub last_login: Option<DateTime<Utc>>,
    pub current: u32,
    pub longest: u32,
}
