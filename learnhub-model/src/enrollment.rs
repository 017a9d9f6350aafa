use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::{CourseId, LessonId};

/// Course progress as a whole percentage, always within `0..=100`.
///
/// Every construction path clamps, including deserialization, so a value
/// read back from a hand-edited store row still honours the range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize,
)]
#[serde(transparent)]
pub struct ProgressPercent(u8);

impl ProgressPercent {
    pub const ZERO: ProgressPercent = ProgressPercent(0);
    pub const COMPLETE: ProgressPercent = ProgressPercent(100);

    pub fn clamped(raw: i64) -> Self {
        ProgressPercent(raw.clamp(0, 100) as u8)
    }

    /// Fractional inputs are rounded before clamping; NaN maps to zero.
    pub fn clamped_f64(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::ZERO;
        }
        ProgressPercent(raw.round().clamp(0.0, 100.0) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_complete(self) -> bool {
        self.0 == 100
    }
}

impl std::fmt::Display for ProgressPercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for ProgressPercent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Ok(ProgressPercent::clamped_f64(raw))
    }
}

/// Per-course progress embedded in a user's `enrolled_courses` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub course_id: CourseId,
    #[serde(default)]
    pub progress: ProgressPercent,
    pub last_accessed: DateTime<Utc>,
    #[serde(default)]
    pub completed_lessons: Vec<LessonId>,
}

impl Enrollment {
    pub fn new(
        course_id: CourseId,
        progress: ProgressPercent,
        at: DateTime<Utc>,
        lesson: Option<LessonId>,
    ) -> Self {
        Enrollment {
            course_id,
            progress,
            last_accessed: at,
            completed_lessons: lesson.into_iter().collect(),
        }
    }

    /// Appends `lesson` unless it is already recorded. Returns whether the
    /// sequence changed.
    pub fn complete_lesson(&mut self, lesson: LessonId) -> bool {
        if self.completed_lessons.contains(&lesson) {
            return false;
        }
        self.completed_lessons.push(lesson);
        true
    }

    pub fn has_completed(&self, lesson: &LessonId) -> bool {
        self.completed_lessons.contains(lesson)
    }
}

/// Ordered enrollment sequence holding at most one entry per course.
///
/// Duplicates coming from the store are collapsed on load, keeping the
/// first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Enrollment>", into = "Vec<Enrollment>")]
pub struct Enrollments(Vec<Enrollment>);

impl Enrollments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, course_id: CourseId) -> Option<&Enrollment> {
        self.0.iter().find(|entry| entry.course_id == course_id)
    }

    /// Merges a progress write for `course_id`.
    ///
    /// Creates the entry lazily when absent; otherwise updates progress and
    /// last access in place and records `lesson` if it is new.
    pub fn apply_progress(
        &mut self,
        course_id: CourseId,
        progress: ProgressPercent,
        lesson: Option<LessonId>,
        at: DateTime<Utc>,
    ) -> &Enrollment {
        let index = match self
            .0
            .iter()
            .position(|entry| entry.course_id == course_id)
        {
            Some(index) => {
                let entry = &mut self.0[index];
                entry.progress = progress;
                entry.last_accessed = at;
                if let Some(lesson) = lesson {
                    entry.complete_lesson(lesson);
                }
                index
            }
            None => {
                self.0.push(Enrollment::new(course_id, progress, at, lesson));
                self.0.len() - 1
            }
        };
        &self.0[index]
    }

    pub fn course_ids(&self) -> Vec<CourseId> {
        self.0.iter().map(|entry| entry.course_id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Enrollment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Enrollment> {
        self.0
    }
}

impl From<Vec<Enrollment>> for Enrollments {
    fn from(entries: Vec<Enrollment>) -> Self {
        let mut out: Vec<Enrollment> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !out.iter().any(|existing| existing.course_id == entry.course_id)
            {
                out.push(entry);
            }
        }
        Enrollments(out)
    }
}

impl From<Enrollments> for Vec<Enrollment> {
    fn from(value: Enrollments) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a Enrollments {
    type Item = &'a Enrollment;
    type IntoIter = std::slice::Iter<'a, Enrollment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, 0, 0).unwrap()
    }

    fn lesson(id: &str) -> LessonId {
        LessonId::new(id).unwrap()
    }

    #[test]
    fn progress_is_clamped_on_every_path() {
        assert_eq!(ProgressPercent::clamped(-20).value(), 0);
        assert_eq!(ProgressPercent::clamped(150).value(), 100);
        assert_eq!(ProgressPercent::clamped(42).value(), 42);
        assert_eq!(ProgressPercent::clamped_f64(f64::NAN).value(), 0);

        let decoded: ProgressPercent = serde_json::from_str("250").unwrap();
        assert_eq!(decoded, ProgressPercent::COMPLETE);
        let decoded: ProgressPercent = serde_json::from_str("33.6").unwrap();
        assert_eq!(decoded.value(), 34);
    }

    #[test]
    fn first_write_creates_entry_with_singleton_lesson() {
        let course = CourseId::new();
        let mut ledger = Enrollments::new();

        let entry = ledger.apply_progress(
            course,
            ProgressPercent::clamped(10),
            Some(lesson("l1")),
            at(9),
        );

        assert_eq!(entry.progress.value(), 10);
        assert_eq!(entry.completed_lessons, vec![lesson("l1")]);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn later_writes_update_in_place_without_duplicate_lessons() {
        let course = CourseId::new();
        let other = CourseId::new();
        let mut ledger = Enrollments::new();
        ledger.apply_progress(other, ProgressPercent::clamped(5), None, at(8));
        ledger.apply_progress(
            course,
            ProgressPercent::clamped(10),
            Some(lesson("l1")),
            at(9),
        );
        ledger.apply_progress(
            course,
            ProgressPercent::clamped(40),
            Some(lesson("l2")),
            at(10),
        );
        let entry = ledger.apply_progress(
            course,
            ProgressPercent::clamped(50),
            Some(lesson("l1")),
            at(11),
        );

        assert_eq!(entry.progress.value(), 50);
        assert_eq!(entry.last_accessed, at(11));
        assert_eq!(entry.completed_lessons, vec![lesson("l1"), lesson("l2")]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.course_ids(), vec![other, course]);
    }

    #[test]
    fn duplicate_rows_collapse_on_load() {
        let course = CourseId::new();
        let json = serde_json::json!([
            {
                "course_id": course,
                "progress": 20,
                "last_accessed": at(1),
                "completed_lessons": ["a"]
            },
            {
                "course_id": course,
                "progress": 90,
                "last_accessed": at(2),
                "completed_lessons": []
            }
        ]);

        let ledger: Enrollments = serde_json::from_value(json).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.find(course).unwrap().progress.value(), 20);
    }
}
