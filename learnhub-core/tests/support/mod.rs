#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use learnhub_core::LearnHubApi;
use learnhub_core::application::AppUnitOfWork;
use learnhub_core::database::{MemoryStore, UsersRepository};
use learnhub_core::domain::AuthCrypto;
use learnhub_core::model::{Course, CourseId, NewUser, UserKey, UserRole};

pub struct Harness {
    pub store: MemoryStore,
    pub api: LearnHubApi,
}

pub fn harness() -> Harness {
    build(MemoryStore::new())
}

/// Every read sleeps for `delay`, so overlapping calls interleave at the
/// first store read.
pub fn slow_harness(delay: Duration) -> Harness {
    build(MemoryStore::new().with_read_delay(delay))
}

fn build(store: MemoryStore) -> Harness {
    let crypto = Arc::new(AuthCrypto::insecure_fast("integration-pepper").unwrap());
    let api = LearnHubApi::new(AppUnitOfWork::memory(store.clone()), crypto);
    Harness { store, api }
}

impl Harness {
    pub async fn student(&self, login_id: &str) -> UserKey {
        let user = NewUser {
            login_id: login_id.to_string(),
            role: UserRole::Student,
            full_name: Some("Test Student".into()),
            email: None,
        };
        self.store
            .create_user(&user, "not-a-phc-string")
            .await
            .unwrap()
            .id
    }

    pub fn course(&self, title: &str, category: &str, minute: u32) -> CourseId {
        let course = Course {
            id: CourseId::new(),
            title: title.to_string(),
            description: format!("{title} from first principles"),
            category: category.to_string(),
            is_visible: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 9, minute, 0).unwrap(),
        };
        let id = course.id;
        self.store.insert_course(course);
        id
    }
}
