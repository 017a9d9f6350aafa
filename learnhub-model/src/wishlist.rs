use serde::{Deserialize, Serialize};

use crate::ids::CourseId;

/// Wishlisted course keys in insertion order, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CourseId>", into = "Vec<CourseId>")]
pub struct Wishlist(Vec<CourseId>);

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` and leaves the list untouched when already present.
    pub fn insert(&mut self, course_id: CourseId) -> bool {
        if self.contains(course_id) {
            return false;
        }
        self.0.push(course_id);
        true
    }

    pub fn remove(&mut self, course_id: CourseId) -> bool {
        let before = self.0.len();
        self.0.retain(|id| *id != course_id);
        self.0.len() != before
    }

    pub fn contains(&self, course_id: CourseId) -> bool {
        self.0.contains(&course_id)
    }

    pub fn as_slice(&self) -> &[CourseId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<CourseId>> for Wishlist {
    fn from(ids: Vec<CourseId>) -> Self {
        let mut list = Wishlist(Vec::with_capacity(ids.len()));
        for id in ids {
            list.insert(id);
        }
        list
    }
}

impl From<Wishlist> for Vec<CourseId> {
    fn from(value: Wishlist) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let id = CourseId::new();
        let mut list = Wishlist::new();
        assert!(list.insert(id));
        assert!(!list.insert(id));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_filters_every_occurrence() {
        let keep = CourseId::new();
        let drop = CourseId::new();
        let mut list = Wishlist::from(vec![keep, drop, drop]);
        assert_eq!(list.len(), 2);
        assert!(list.remove(drop));
        assert!(!list.remove(drop));
        assert_eq!(list.as_slice(), &[keep]);
    }
}
