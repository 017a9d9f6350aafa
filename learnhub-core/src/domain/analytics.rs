use std::fmt;
use std::sync::Arc;

use learnhub_model::{UserKey, UserRecord};
use serde::{Deserialize, Serialize};

use crate::database::ports::users::UsersRepository;
use crate::error::Result;

/// Estimated study hours for a fully completed course.
pub const HOURS_PER_COURSE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudentAnalytics {
    pub total_courses: usize,
    pub completed_courses: usize,
    pub total_hours: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl StudentAnalytics {
    pub fn summarize(user: &UserRecord) -> Self {
        let enrollments = &user.enrolled_courses;
        let weighted_hours: f64 = enrollments
            .iter()
            .map(|entry| {
                HOURS_PER_COURSE * f64::from(entry.progress.value()) / 100.0
            })
            .sum();

        Self {
            total_courses: enrollments.len(),
            completed_courses: enrollments
                .iter()
                .filter(|entry| entry.progress.is_complete())
                .count(),
            total_hours: weighted_hours.round() as u64,
            current_streak: user.current_streak,
            longest_streak: user.longest_streak,
        }
    }
}

#[derive(Clone)]
pub struct AnalyticsService {
    users: Arc<dyn UsersRepository>,
}

impl fmt::Debug for AnalyticsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticsService")
            .field("users", &std::any::type_name_of_val(self.users.as_ref()))
            .finish()
    }
}

impl AnalyticsService {
    pub fn new(users: Arc<dyn UsersRepository>) -> Self {
        Self { users }
    }

    pub async fn student_analytics(&self, user: UserKey) -> Result<StudentAnalytics> {
        let record = self.users.get_user(user).await?;
        Ok(StudentAnalytics::summarize(&record))
    }
}
