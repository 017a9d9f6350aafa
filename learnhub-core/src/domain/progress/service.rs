use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use learnhub_model::{CourseId, LessonId, ProgressPercent, UserKey};
use tracing::{debug, instrument};

use super::guard::{GuardKey, UpdateGuard};
use super::queue::UserWriteQueue;
use crate::api_types::{ProgressSnapshot, ProgressUpdated};
use crate::database::ports::users::UsersRepository;
use crate::error::{LearnError, Result};

/// Progress bookkeeping over the user's embedded enrollment sequence.
#[derive(Clone)]
pub struct ProgressService {
    users: Arc<dyn UsersRepository>,
    guard: UpdateGuard,
    queue: UserWriteQueue,
}

impl fmt::Debug for ProgressService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressService")
            .field("users", &std::any::type_name_of_val(self.users.as_ref()))
            .field("in_flight", &self.guard.in_flight())
            .field("active_lanes", &self.queue.active_lanes())
            .finish()
    }
}

impl ProgressService {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        guard: UpdateGuard,
        queue: UserWriteQueue,
    ) -> Self {
        Self {
            users,
            guard,
            queue,
        }
    }

    pub fn guard(&self) -> &UpdateGuard {
        &self.guard
    }

    /// Records progress (and optionally a completed lesson) for one course.
    ///
    /// A concurrent call for the same `(user, course)` fails with
    /// [`LearnError::Contention`] without waiting. The persisted value is
    /// always clamped to `0..=100` and returned to the caller.
    #[instrument(skip(self), fields(key = %GuardKey::new(user, course)))]
    pub async fn update_progress(
        &self,
        user: UserKey,
        course: CourseId,
        progress: i64,
        lesson: Option<&str>,
    ) -> Result<ProgressUpdated> {
        let key = GuardKey::new(user, course);
        let Some(_permit) = self.guard.try_acquire(key) else {
            debug!("progress update already in flight");
            return Err(LearnError::Contention {
                key: key.to_string(),
            });
        };

        let lesson = lesson.map(LessonId::new).transpose()?;
        let progress = ProgressPercent::clamped(progress);

        let _turn = self.queue.enter(user).await;
        let mut enrollments = self.users.get_enrollments(user).await?;
        let entry =
            enrollments.apply_progress(course, progress, lesson, Utc::now());
        debug!(
            progress = entry.progress.value(),
            completed = entry.completed_lessons.len(),
            "enrollment merged"
        );
        self.users.replace_enrollments(user, &enrollments).await?;

        Ok(ProgressUpdated {
            progress: progress.value(),
        })
    }

    /// Read-only view of one enrollment; zeroed when the user never touched
    /// the course.
    pub async fn get_progress(
        &self,
        user: UserKey,
        course: CourseId,
    ) -> Result<ProgressSnapshot> {
        let enrollments = self.users.get_enrollments(user).await?;
        Ok(enrollments
            .find(course)
            .map(|entry| ProgressSnapshot {
                progress: entry.progress.value(),
                completed_lessons: entry.completed_lessons.clone(),
                last_accessed: Some(entry.last_accessed),
            })
            .unwrap_or_default())
    }
}
