use serde_json::Value;

/// Case-insensitive substring filter over JSON items, matching against
/// dotted key paths such as `instructor.name`.
#[derive(Debug, Clone)]
pub struct ItemFilter {
    items: Vec<Value>,
    keys: Vec<String>,
}

fn lookup<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(item, |current, segment| current.get(segment))
}

fn searchable_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.to_lowercase()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

impl ItemFilter {
    pub fn new<K: Into<String>>(
        items: Vec<Value>,
        keys: impl IntoIterator<Item = K>,
    ) -> Self {
        Self {
            items,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// A blank query returns every item.
    pub fn search(&self, query: &str) -> Vec<&Value> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| {
                self.keys.iter().any(|key| {
                    lookup(item, key)
                        .and_then(searchable_text)
                        .is_some_and(|text| text.contains(&query))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn matches_nested_keys() {
        let filter = ItemFilter::new(
            vec![
                json!({ "title": "Rust Basics", "instructor": { "name": "Ada" } }),
                json!({ "title": "Design", "instructor": { "name": "Grace" } }),
                json!({ "title": "Ops", "instructor": null }),
            ],
            ["title", "instructor.name"],
        );

        assert_eq!(filter.search("  ").len(), 3);
        assert_eq!(filter.search("rust").len(), 1);
        assert_eq!(filter.search("GRACE")[0]["title"], "Design");
        assert!(filter.search("nobody").is_empty());
    }
}
