use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Role attached to a user row.
///
/// Logins are scoped to a role: the same login id under a different role is
/// treated as a different (usually missing) account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Learner enrolled in courses
    #[default]
    Student,

    /// Course author; can manage course content
    Instructor,

    /// Platform administrator with access to the admin area
    Admin,
}

impl UserRole {
    /// Check if this role can access admin features
    pub fn can_access_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Check if this role can manage course content
    pub fn can_manage_courses(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Instructor)
    }

    pub fn all() -> &'static [UserRole] {
        &[UserRole::Student, UserRole::Instructor, UserRole::Admin]
    }

    /// Get the role name as stored in the `role` column
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Instructor => "instructor",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "Student"),
            UserRole::Instructor => write!(f, "Instructor"),
            UserRole::Admin => write!(f, "Administrator"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "instructor" | "teacher" => Ok(UserRole::Instructor),
            "admin" | "administrator" => Ok(UserRole::Admin),
            _ => Err(ModelError::InvalidRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_capabilities() {
        assert!(UserRole::Admin.can_access_admin());
        assert!(UserRole::Admin.can_manage_courses());

        assert!(!UserRole::Instructor.can_access_admin());
        assert!(UserRole::Instructor.can_manage_courses());

        assert!(!UserRole::Student.can_access_admin());
        assert!(!UserRole::Student.can_manage_courses());
    }

    #[test]
    fn string_conversion() {
        assert_eq!(UserRole::default(), UserRole::Student);
        assert_eq!(UserRole::Student.as_str(), "student");
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(
            "Administrator".parse::<UserRole>().unwrap(),
            UserRole::Admin
        );
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&UserRole::Instructor).unwrap();
        assert_eq!(json, "\"instructor\"");
    }
}
