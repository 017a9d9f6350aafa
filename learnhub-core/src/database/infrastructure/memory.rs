//! In-process store used by tests, demos and the `memory` backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use learnhub_model::{
    Course, CourseId, Enrollments, NewCourse, NewUser, StreakState, UserKey,
    UserRecord, UserRole, Wishlist,
};
use parking_lot::{Mutex, RwLock};

use crate::database::ports::courses::{CourseSearchRows, CoursesRepository};
use crate::database::ports::users::{LoginRecord, UsersRepository};
use crate::database::StoreResult;
use crate::error::StoreError;
use crate::query::CourseQuery;

#[derive(Debug, Clone)]
struct StoredUser {
    record: UserRecord,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserKey, StoredUser>,
    courses: Vec<Course>,
}

/// `users` and `courses` tables held in memory.
///
/// Reads can be slowed down with [`MemoryStore::with_read_delay`] so that
/// overlapping calls interleave deterministically, and the next call can be
/// made to fail with [`MemoryStore::fail_next`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    read_delay: Duration,
    injected: Arc<Mutex<Option<StoreError>>>,
    course_reads: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    /// The next store call returns `err` instead of touching the tables.
    pub fn fail_next(&self, err: StoreError) {
        *self.injected.lock() = Some(err);
    }

    /// Number of queries issued against the `courses` table.
    pub fn course_reads(&self) -> usize {
        self.course_reads.load(Ordering::Relaxed)
    }

    pub fn insert_course(&self, course: Course) {
        self.tables.write().courses.push(course);
    }

    fn take_injected(&self) -> StoreResult<()> {
        match self.injected.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn before_read(&self) -> StoreResult<()> {
        self.take_injected()?;
        if !self.read_delay.is_zero() {
            tokio::time::sleep(self.read_delay).await;
        }
        Ok(())
    }

    fn read_user<T>(
        &self,
        id: UserKey,
        project: impl FnOnce(&StoredUser) -> T,
    ) -> StoreResult<T> {
        let tables = self.tables.read();
        tables.users.get(&id).map(project).ok_or(StoreError::NoRows)
    }

    fn write_user(
        &self,
        id: UserKey,
        apply: impl FnOnce(&mut StoredUser),
    ) -> StoreResult<()> {
        self.take_injected()?;
        let mut tables = self.tables.write();
        let user = tables.users.get_mut(&id).ok_or(StoreError::NoRows)?;
        apply(user);
        Ok(())
    }
}

#[async_trait]
impl UsersRepository for MemoryStore {
    async fn find_for_login(
        &self,
        login_id: &str,
        role: UserRole,
    ) -> StoreResult<LoginRecord> {
        self.before_read().await?;
        let tables = self.tables.read();
        tables
            .users
            .values()
            .find(|user| {
                user.record.login_id == login_id && user.record.role == role
            })
            .map(|user| LoginRecord {
                user: user.record.clone(),
                password_hash: user.password_hash.clone(),
            })
            .ok_or(StoreError::NoRows)
    }

    async fn get_user(&self, id: UserKey) -> StoreResult<UserRecord> {
        self.before_read().await?;
        self.read_user(id, |user| user.record.clone())
    }

    async fn get_enrollments(&self, id: UserKey) -> StoreResult<Enrollments> {
        self.before_read().await?;
        self.read_user(id, |user| user.record.enrolled_courses.clone())
    }

    async fn replace_enrollments(
        &self,
        id: UserKey,
        enrollments: &Enrollments,
    ) -> StoreResult<()> {
        self.write_user(id, |user| {
            user.record.enrolled_courses = enrollments.clone();
        })
    }

    async fn get_wishlist(&self, id: UserKey) -> StoreResult<Wishlist> {
        self.before_read().await?;
        self.read_user(id, |user| user.record.wishlist.clone())
    }

    async fn replace_wishlist(
        &self,
        id: UserKey,
        wishlist: &Wishlist,
    ) -> StoreResult<()> {
        self.write_user(id, |user| {
            user.record.wishlist = wishlist.clone();
        })
    }

    async fn get_streak(&self, id: UserKey) -> StoreResult<StreakState> {
        self.before_read().await?;
        self.read_user(id, |user| user.record.streak())
    }

    async fn record_login(
        &self,
        id: UserKey,
        streak: &StreakState,
    ) -> StoreResult<()> {
        self.write_user(id, |user| {
            user.record.last_login = streak.last_login;
            user.record.current_streak = streak.current;
            user.record.longest_streak = streak.longest;
        })
    }

    async fn create_user(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> StoreResult<UserRecord> {
        self.take_injected()?;
        let mut tables = self.tables.write();
        let taken = tables.users.values().any(|existing| {
            existing.record.login_id == user.login_id
                && existing.record.role == user.role
        });
        if taken {
            return Err(StoreError::backend(
                "23505",
                "duplicate key value violates unique constraint \"users_login_role_unique\"",
            ));
        }

        let record = user.clone().into_record(UserKey::new());
        tables.users.insert(
            record.id,
            StoredUser {
                record: record.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(record)
    }

    async fn set_password_hash(
        &self,
        id: UserKey,
        password_hash: &str,
    ) -> StoreResult<()> {
        self.write_user(id, |user| {
            user.password_hash = password_hash.to_string();
        })
    }
}

#[async_trait]
impl CoursesRepository for MemoryStore {
    async fn courses_by_ids(&self, ids: &[CourseId]) -> StoreResult<Vec<Course>> {
        self.course_reads.fetch_add(1, Ordering::Relaxed);
        self.before_read().await?;
        let tables = self.tables.read();
        Ok(tables
            .courses
            .iter()
            .filter(|course| ids.contains(&course.id))
            .cloned()
            .collect())
    }

    async fn search(&self, query: &CourseQuery) -> StoreResult<CourseSearchRows> {
        self.course_reads.fetch_add(1, Ordering::Relaxed);
        self.before_read().await?;
        let tables = self.tables.read();

        let mut matching: Vec<&Course> = tables
            .courses
            .iter()
            .filter(|course| course.is_visible)
            .filter(|course| query.matches_text(course))
            .filter(|course| query.matches_category(course))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let offset = usize::try_from(query.pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.pagination.limit()).unwrap_or(usize::MAX);
        let rows = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(CourseSearchRows { rows, total })
    }

    async fn create_course(&self, course: &NewCourse) -> StoreResult<Course> {
        self.take_injected()?;
        let created = course.clone().into_course(CourseId::new(), Utc::now());
        self.tables.write().courses.push(created.clone());
        Ok(created)
    }
}
