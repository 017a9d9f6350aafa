use learnhub_model::Course;
use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Category sentinel meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Result<Self> {
        if page == 0 {
            return Err(LearnError::validation("Page must be at least 1"));
        }
        if page_size == 0 {
            return Err(LearnError::validation("Page size must be at least 1"));
        }
        Ok(Self { page, page_size })
    }

    /// Zero-based offset of the first row.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// Inclusive `(from, to)` row range.
    pub fn range(&self) -> (u64, u64) {
        let from = self.offset();
        (from, from + self.limit() - 1)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub category: Option<String>,
}

/// A fully normalized search request.
///
/// `text` has been trimmed and stripped of `%` / `_`; `category` is never
/// blank or the [`ALL_CATEGORIES`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CourseQuery {
    pub text: Option<String>,
    pub category: Option<String>,
    pub pagination: Pagination,
}

impl CourseQuery {
    /// Case-insensitive contains match against title or description.
    pub fn matches_text(&self, course: &Course) -> bool {
        match &self.text {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                course.title.to_lowercase().contains(&needle)
                    || course.description.to_lowercase().contains(&needle)
            }
        }
    }

    pub fn matches_category(&self, course: &Course) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| course.category == category)
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePage {
    pub courses: Vec<Course>,
    pub total_pages: u64,
    pub current_page: u32,
    pub total: u64,
}
