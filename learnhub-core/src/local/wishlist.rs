use std::sync::Arc;

use learnhub_model::CourseId;
use tokio::sync::broadcast;
use tracing::warn;

use super::storage::{LocalStore, LocalStoreError, WISHLIST_KEY};

/// Client-side wishlist persisted as a JSON array.
///
/// Every change broadcasts the full list to subscribers.
#[derive(Debug, Clone)]
pub struct LocalWishlist {
    store: Arc<dyn LocalStore>,
    updates: broadcast::Sender<Vec<CourseId>>,
}

impl LocalWishlist {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        let (updates, _) = broadcast::channel(16);
        Self { store, updates }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Vec<CourseId>> {
        self.updates.subscribe()
    }

    pub fn all(&self) -> Vec<CourseId> {
        let Some(raw) = self.store.get_item(WISHLIST_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(error = %err, "discarding unreadable local wishlist");
            Vec::new()
        })
    }

    pub fn has(&self, course: CourseId) -> bool {
        self.all().contains(&course)
    }

    /// Returns `false` when already present.
    pub fn add(&self, course: CourseId) -> Result<bool, LocalStoreError> {
        let mut list = self.all();
        if list.contains(&course) {
            return Ok(false);
        }
        list.push(course);
        self.save(list)?;
        Ok(true)
    }

    /// Returns `false` when it was not present.
    pub fn remove(&self, course: CourseId) -> Result<bool, LocalStoreError> {
        let mut list = self.all();
        let Some(index) = list.iter().position(|id| *id == course) else {
            return Ok(false);
        };
        list.remove(index);
        self.save(list)?;
        Ok(true)
    }

    pub fn toggle(&self, course: CourseId) -> Result<bool, LocalStoreError> {
        if self.has(course) {
            self.remove(course)
        } else {
            self.add(course)
        }
    }

    fn save(&self, list: Vec<CourseId>) -> Result<(), LocalStoreError> {
        self.store
            .set_item(WISHLIST_KEY, &serde_json::to_string(&list)?)?;
        // No subscribers is fine.
        let _ = self.updates.send(list);
        Ok(())
    }
}
