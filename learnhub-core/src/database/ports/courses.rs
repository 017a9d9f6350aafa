use async_trait::async_trait;
use learnhub_model::{Course, CourseId, NewCourse};

use crate::database::StoreResult;
use crate::query::CourseQuery;

/// One page of search rows plus the exact count of all matching rows.
#[derive(Debug, Clone, Default)]
pub struct CourseSearchRows {
    pub rows: Vec<Course>,
    pub total: u64,
}

#[async_trait]
pub trait CoursesRepository: Send + Sync {
    /// Set-membership lookup. Unknown ids are skipped; row order is not
    /// guaranteed to follow `ids`.
    async fn courses_by_ids(&self, ids: &[CourseId]) -> StoreResult<Vec<Course>>;

    /// Visible courses matching `query`, newest first.
    async fn search(&self, query: &CourseQuery) -> StoreResult<CourseSearchRows>;

    async fn create_course(&self, course: &NewCourse) -> StoreResult<Course>;
}
