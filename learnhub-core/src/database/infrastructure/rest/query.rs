//! PostgREST query-string composition.

use learnhub_model::CourseId;

use crate::query::CourseQuery;

/// Characters with meaning inside PostgREST filter values.
const RESERVED: [char; 6] = [',', '.', ':', '(', ')', '"'];

/// Quotes a filter value when it contains reserved characters.
pub fn quote_value(value: &str) -> String {
    if value.contains(RESERVED) || value.contains('\\') {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

/// Ordered list of query-string pairs for one table request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestQuery {
    pairs: Vec<(String, String)>,
}

impl RestQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.pairs.push(("select".into(), columns.into()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        let value = quote_value(&value.to_string());
        self.pairs.push((column.into(), format!("eq.{value}")));
        self
    }

    pub fn in_list<I, T>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let joined = values
            .into_iter()
            .map(|value| quote_value(&value.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push((column.into(), format!("in.({joined})")));
        self
    }

    /// Case-insensitive contains match on any of `columns`.
    pub fn or_ilike(mut self, columns: &[&str], text: &str) -> Self {
        let needle = quote_value(&format!("*{text}*"));
        let clauses = columns
            .iter()
            .map(|column| format!("{column}.ilike.{needle}"))
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push(("or".into(), format!("({clauses})")));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.pairs.push(("order".into(), format!("{column}.desc")));
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.pairs.push(("offset".into(), offset.to_string()));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.pairs.push(("limit".into(), limit.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Visible-course search with optional text and category filters.
    pub fn course_search(query: &CourseQuery) -> Self {
        let mut rest = RestQuery::new().select("*").eq("is_visible", true);
        if let Some(text) = &query.text {
            rest = rest.or_ilike(&["title", "description"], text);
        }
        if let Some(category) = &query.category {
            rest = rest.eq("category", category);
        }
        rest.order_desc("created_at")
            .offset(query.pagination.offset())
            .limit(query.pagination.limit())
    }

    pub fn courses_by_ids(ids: &[CourseId]) -> Self {
        RestQuery::new().select("*").in_list("id", ids)
    }
}

/// Total row count from a `Content-Range` header such as `0-11/25`.
pub fn content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::CourseQueryBuilder;

    fn find<'a>(query: &'a RestQuery, key: &str) -> Option<&'a str> {
        query
            .pairs()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn search_composes_postgrest_filters() {
        let query = CourseQueryBuilder::new()
            .text("100% _wild%card")
            .category("design")
            .page(3)
            .page_size(12)
            .build()
            .unwrap();
        let rest = RestQuery::course_search(&query);

        assert_eq!(find(&rest, "is_visible"), Some("eq.true"));
        assert_eq!(
            find(&rest, "or"),
            Some("(title.ilike.*100 wildcard*,description.ilike.*100 wildcard*)")
        );
        assert_eq!(find(&rest, "category"), Some("eq.design"));
        assert_eq!(find(&rest, "order"), Some("created_at.desc"));
        assert_eq!(find(&rest, "offset"), Some("24"));
        assert_eq!(find(&rest, "limit"), Some("12"));
    }

    #[test]
    fn user_asterisks_never_reach_the_ilike_pattern() {
        let query = CourseQueryBuilder::new().text("a*z").build().unwrap();
        let rest = RestQuery::course_search(&query);
        assert_eq!(
            find(&rest, "or"),
            Some("(title.ilike.*az*,description.ilike.*az*)")
        );

        let query = CourseQueryBuilder::new().text("***").build().unwrap();
        assert_eq!(find(&RestQuery::course_search(&query), "or"), None);
    }

    #[test]
    fn reserved_characters_are_quoted() {
        let rest = RestQuery::new().or_ilike(&["title"], "a,b");
        assert_eq!(find(&rest, "or"), Some("(title.ilike.\"*a,b*\")"));
        assert_eq!(quote_value("plain"), "plain");
        assert_eq!(quote_value("say \"hi\"."), "\"say \\\"hi\\\".\"");
    }

    #[test]
    fn membership_filter_lists_ids() {
        let a = CourseId::new();
        let b = CourseId::new();
        let rest = RestQuery::courses_by_ids(&[a, b]);
        assert_eq!(find(&rest, "id"), Some(format!("in.({a},{b})").as_str()));
    }

    #[test]
    fn parses_content_range() {
        assert_eq!(content_range_total("0-11/25"), Some(25));
        assert_eq!(content_range_total("*/0"), Some(0));
        assert_eq!(content_range_total("0-11/*"), None);
        assert_eq!(content_range_total("garbage"), None);
    }
}
