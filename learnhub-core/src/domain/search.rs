use std::fmt;
use std::sync::Arc;

use crate::database::ports::courses::CoursesRepository;
use crate::error::Result;
use crate::query::{CoursePage, CourseQueryBuilder, DEFAULT_PAGE_SIZE, SearchFilters};

#[derive(Clone)]
pub struct SearchService {
    courses: Arc<dyn CoursesRepository>,
    default_page_size: u32,
}

impl fmt::Debug for SearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchService")
            .field(
                "courses",
                &std::any::type_name_of_val(self.courses.as_ref()),
            )
            .field("default_page_size", &self.default_page_size)
            .finish()
    }
}

impl SearchService {
    pub fn new(courses: Arc<dyn CoursesRepository>) -> Self {
        Self {
            courses,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    /// Paginated search over visible courses, newest first.
    ///
    /// `page_size` falls back to the configured default when `None`.
    pub async fn courses(
        &self,
        text: &str,
        filters: &SearchFilters,
        page: u32,
        page_size: Option<u32>,
    ) -> Result<CoursePage> {
        let query = CourseQueryBuilder::new()
            .text(text)
            .filters(filters)
            .page(page)
            .page_size(page_size.unwrap_or(self.default_page_size))
            .build()?;

        let found = self.courses.search(&query).await?;
        Ok(CoursePage {
            courses: found.rows,
            total_pages: query.pagination.total_pages(found.total),
            current_page: query.pagination.page,
            total: found.total,
        })
    }
}
