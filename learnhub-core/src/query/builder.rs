use super::types::*;

/// Trims the raw search text and removes wildcard controls: `%` and `_` for
/// SQL `ILIKE`, `*` for the REST filter syntax.
///
/// Returns `None` when nothing is left to match.
pub fn sanitize_search_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let safe: String = trimmed.chars().filter(|c| !matches!(c, '%' | '_' | '*')).collect();
    if safe.trim().is_empty() { None } else { Some(safe) }
}

/// Drops blank categories and the [`ALL_CATEGORIES`] sentinel.
pub fn normalize_category(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Fluent API for building course searches
#[derive(Debug, Clone)]
pub struct CourseQueryBuilder {
    text: Option<String>,
    category: Option<String>,
    page: u32,
    page_size: u32,
}

impl Default for CourseQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseQueryBuilder {
    pub fn new() -> Self {
        Self {
            text: None,
            category: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Free-text filter over title and description
    pub fn text(mut self, raw: &str) -> Self {
        self.text = sanitize_search_text(raw);
        self
    }

    /// Category equality filter; `all` clears it
    pub fn category(mut self, raw: &str) -> Self {
        self.category = normalize_category(raw);
        self
    }

    pub fn filters(self, filters: &SearchFilters) -> Self {
        match filters.category.as_deref() {
            Some(category) => self.category(category),
            None => self,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn build(self) -> crate::error::Result<CourseQuery> {
        Ok(CourseQuery {
            text: self.text,
            category: self.category,
            pagination: Pagination::new(self.page, self.page_size)?,
        })
    }
}
