//! Course search query model and its fluent builder.

pub mod builder;
pub mod types;

pub use builder::{CourseQueryBuilder, normalize_category, sanitize_search_text};
pub use types::{
    ALL_CATEGORIES, CoursePage, CourseQuery, DEFAULT_PAGE_SIZE, Pagination,
    SearchFilters,
};
