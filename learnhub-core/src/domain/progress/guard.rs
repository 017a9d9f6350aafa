use std::fmt;
use std::sync::Arc;

use dashmap::DashSet;
use learnhub_model::{CourseId, UserKey};

/// Composite `(user, course)` key of an in-flight progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuardKey {
    pub user: UserKey,
    pub course: CourseId,
}

impl GuardKey {
    pub fn new(user: UserKey, course: CourseId) -> Self {
        Self { user, course }
    }
}

impl fmt::Display for GuardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.user, self.course)
    }
}

/// Process-wide registry of progress updates currently in flight.
///
/// At most one update per [`GuardKey`] may hold a permit. A second caller is
/// refused immediately rather than queued.
#[derive(Debug, Clone, Default)]
pub struct UpdateGuard {
    in_flight: Arc<DashSet<GuardKey>>,
}

impl UpdateGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when `key` is already held.
    pub fn try_acquire(&self, key: GuardKey) -> Option<UpdatePermit> {
        if self.in_flight.insert(key) {
            Some(UpdatePermit {
                key,
                in_flight: Arc::clone(&self.in_flight),
            })
        } else {
            None
        }
    }

    pub fn is_held(&self, key: &GuardKey) -> bool {
        self.in_flight.contains(key)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// Membership in the [`UpdateGuard`]; the key is released on drop.
#[derive(Debug)]
pub struct UpdatePermit {
    key: GuardKey,
    in_flight: Arc<DashSet<GuardKey>>,
}

impl UpdatePermit {
    pub fn key(&self) -> GuardKey {
        self.key
    }
}

impl Drop for UpdatePermit {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}
