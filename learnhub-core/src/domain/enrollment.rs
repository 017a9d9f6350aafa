use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use learnhub_model::UserKey;

use crate::api_types::EnrolledCourse;
use crate::database::ports::courses::CoursesRepository;
use crate::database::ports::users::UsersRepository;
use crate::error::Result;

#[derive(Clone)]
pub struct EnrollmentService {
    users: Arc<dyn UsersRepository>,
    courses: Arc<dyn CoursesRepository>,
}

impl fmt::Debug for EnrollmentService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrollmentService")
            .field("users", &std::any::type_name_of_val(self.users.as_ref()))
            .field(
                "courses",
                &std::any::type_name_of_val(self.courses.as_ref()),
            )
            .finish()
    }
}

impl EnrollmentService {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        courses: Arc<dyn CoursesRepository>,
    ) -> Self {
        Self { users, courses }
    }

    /// Enrolled courses merged with their progress, in enrollment order.
    ///
    /// Enrollments whose course row no longer exists are skipped.
    pub async fn get_enrolled(&self, user: UserKey) -> Result<Vec<EnrolledCourse>> {
        let enrollments = self.users.get_enrollments(user).await?;
        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let mut courses: HashMap<_, _> = self
            .courses
            .courses_by_ids(&enrollments.course_ids())
            .await?
            .into_iter()
            .map(|course| (course.id, course))
            .collect();

        Ok(enrollments
            .iter()
            .filter_map(|entry| {
                courses.remove(&entry.course_id).map(|course| EnrolledCourse {
                    course,
                    progress: entry.progress.value(),
                    last_accessed: Some(entry.last_accessed),
                    completed_lessons: entry.completed_lessons.clone(),
                })
            })
            .collect())
    }
}
