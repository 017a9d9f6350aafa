//! Record validators and per-field form rules.

use std::collections::BTreeMap;

use learnhub_model::NewCourse;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex")
});
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s\-+()]+$").expect("phone regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

fn shorter_than(value: Option<&str>, min: usize) -> bool {
    value.is_none_or(|v| v.trim().chars().count() < min)
}

/// Every failure for a course draft, in a stable order.
pub fn validate_course(course: &NewCourse) -> Vec<String> {
    let mut errors = Vec::new();
    if shorter_than(Some(&course.title), 3) {
        errors.push("Title must be at least 3 characters".to_string());
    }
    if shorter_than(Some(&course.description), 10) {
        errors.push("Description must be at least 10 characters".to_string());
    }
    errors
}

/// Profile fields as submitted by the admin user form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserDraft {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Every failure for a user profile draft. Missing email or phone count as
/// malformed.
pub fn validate_user(draft: &UserDraft) -> Vec<String> {
    let mut errors = Vec::new();
    if shorter_than(draft.full_name.as_deref(), 2) {
        errors.push("Name must be at least 2 characters".to_string());
    }
    if !draft.email.as_deref().is_some_and(is_valid_email) {
        errors.push("Invalid email format".to_string());
    }
    if !draft.phone.as_deref().is_some_and(is_valid_phone) {
        errors.push("Invalid phone format".to_string());
    }
    errors
}

/// One form-field constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Required,
    Email,
    Phone,
    MinLength(usize),
    MaxLength(usize),
}

impl FieldRule {
    pub fn message(&self) -> String {
        match self {
            FieldRule::Required => "This field is required".to_string(),
            FieldRule::Email => "Please enter a valid email address".to_string(),
            FieldRule::Phone => "Please enter a valid phone number".to_string(),
            FieldRule::MinLength(n) => format!("Minimum {n} characters required"),
            FieldRule::MaxLength(n) => format!("Maximum {n} characters allowed"),
        }
    }

    /// `value` is already trimmed. Only `Required` rejects an empty value.
    fn accepts(&self, value: &str) -> bool {
        if value.is_empty() {
            return *self != FieldRule::Required;
        }
        match self {
            FieldRule::Required => true,
            FieldRule::Email => is_valid_email(value),
            FieldRule::Phone => is_valid_phone(value),
            FieldRule::MinLength(n) => value.chars().count() >= *n,
            FieldRule::MaxLength(n) => value.chars().count() <= *n,
        }
    }
}

/// Rules for one field, checked in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules(Vec<FieldRule>);

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.0.push(rule);
        self
    }

    /// First failing rule's message.
    pub fn check(&self, raw: &str) -> Result<(), String> {
        let value = raw.trim();
        match self.0.iter().find(|rule| !rule.accepts(value)) {
            Some(rule) => Err(rule.message()),
            None => Ok(()),
        }
    }
}

impl From<Vec<FieldRule>> for FieldRules {
    fn from(rules: Vec<FieldRule>) -> Self {
        Self(rules)
    }
}

/// Named fields of one form.
#[derive(Debug, Clone, Default)]
pub struct FormRules {
    fields: BTreeMap<String, FieldRules>,
}

impl FormRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rules: impl Into<FieldRules>) -> Self {
        self.fields.insert(name.into(), rules.into());
        self
    }

    /// Failures keyed by field name; empty when the form is valid. Absent
    /// values are checked as empty strings.
    pub fn validate(&self, values: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|(name, rules)| {
                let value = values.get(name).map(String::as_str).unwrap_or("");
                rules.check(value).err().map(|message| (name.clone(), message))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str, description: &str) -> NewCourse {
        NewCourse {
            title: title.into(),
            description: description.into(),
            category: "programming".into(),
            is_visible: true,
        }
    }

    #[test]
    fn course_drafts() {
        assert!(validate_course(&course("Rust", "Ownership and borrowing")).is_empty());
        assert_eq!(
            validate_course(&course("  R ", "short")),
            vec![
                "Title must be at least 3 characters",
                "Description must be at least 10 characters"
            ]
        );
    }

    #[test]
    fn user_drafts() {
        let good = UserDraft {
            full_name: Some("Ada Lovelace".into()),
            email: Some("ada@example.com".into()),
            phone: Some("+1 (555) 010-2000".into()),
        };
        assert!(validate_user(&good).is_empty());

        let errors = validate_user(&UserDraft {
            full_name: Some("A".into()),
            email: Some("ada@example".into()),
            phone: None,
        });
        assert_eq!(
            errors,
            vec!["Name must be at least 2 characters", "Invalid email format", "Invalid phone format"]
        );
    }

    #[test]
    fn field_rules_first_failure_wins() {
        let rules = FieldRules::new()
            .rule(FieldRule::Required)
            .rule(FieldRule::Email)
            .rule(FieldRule::MaxLength(12));

        assert_eq!(rules.check("   "), Err("This field is required".into()));
        assert_eq!(rules.check("nope"), Err("Please enter a valid email address".into()));
        assert_eq!(
            rules.check("ada@example.com"),
            Err("Maximum 12 characters allowed".into())
        );
        assert_eq!(rules.check(" a@b.io "), Ok(()));
    }

    #[test]
    fn optional_fields_skip_shape_rules_when_empty() {
        let rules = FieldRules::from(vec![FieldRule::Phone, FieldRule::MinLength(7)]);
        assert_eq!(rules.check(""), Ok(()));
        assert_eq!(rules.check("555"), Err("Minimum 7 characters required".into()));
        assert_eq!(rules.check("call me"), Err("Please enter a valid phone number".into()));
    }

    #[test]
    fn form_collects_failures_per_field() {
        let form = FormRules::new()
            .field("email", vec![FieldRule::Required, FieldRule::Email])
            .field("phone", vec![FieldRule::Phone]);
        let values = BTreeMap::from([("phone".to_string(), "x".to_string())]);

        let errors = form.validate(&values);
        assert_eq!(errors.get("email").map(String::as_str), Some("This field is required"));
        assert_eq!(
            errors.get("phone").map(String::as_str),
            Some("Please enter a valid phone number")
        );
    }
}
