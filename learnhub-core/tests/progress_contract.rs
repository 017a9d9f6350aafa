mod support;

use std::time::Duration;

use learnhub_core::ErrorKind;
use learnhub_core::api_types::messages;
use learnhub_core::database::UsersRepository;
use learnhub_core::StoreError;
use learnhub_core::model::{CourseId, UserKey};
use support::{harness, slow_harness};

#[tokio::test]
async fn progress_is_clamped_and_echoed() {
    let h = harness();
    let user = h.student("STU-2025-2001").await;
    let course = h.course("Rust", "programming", 0);

    let high = h.api.update_progress(user, course, 150, None).await.unwrap();
    assert_eq!(high.progress, 100);

    let low = h.api.update_progress(user, course, -20, None).await.unwrap();
    assert_eq!(low.progress, 0);

    let snapshot = h.api.get_progress(user, course).await.unwrap();
    assert_eq!(snapshot.progress, 0);
    assert!(snapshot.last_accessed.is_some());
}

#[tokio::test]
async fn lessons_are_recorded_once() {
    let h = harness();
    let user = h.student("STU-2025-2002").await;
    let course = h.course("Rust", "programming", 0);

    h.api
        .update_progress(user, course, 10, Some("intro"))
        .await
        .unwrap();
    h.api
        .update_progress(user, course, 20, Some("intro"))
        .await
        .unwrap();
    h.api
        .update_progress(user, course, 30, Some("ownership"))
        .await
        .unwrap();

    let snapshot = h.api.get_progress(user, course).await.unwrap();
    let lessons: Vec<&str> = snapshot
        .completed_lessons
        .iter()
        .map(|lesson| lesson.as_str())
        .collect();
    assert_eq!(lessons, vec!["intro", "ownership"]);
    assert_eq!(snapshot.progress, 30);
}

#[tokio::test]
async fn untouched_course_reads_as_zero() {
    let h = harness();
    let user = h.student("STU-2025-2003").await;

    let snapshot = h.api.get_progress(user, CourseId::new()).await.unwrap();
    assert_eq!(snapshot.progress, 0);
    assert!(snapshot.completed_lessons.is_empty());
    assert_eq!(snapshot.last_accessed, None);
}

#[tokio::test(start_paused = true)]
async fn overlapping_updates_for_one_key_are_rejected() {
    let h = slow_harness(Duration::from_millis(50));
    let user = h.student("STU-2025-2004").await;
    let course = h.course("Rust", "programming", 0);

    let (first, second) = tokio::join!(
        h.api.update_progress(user, course, 40, None),
        h.api.update_progress(user, course, 90, None),
    );

    assert_eq!(first.unwrap().progress, 40);
    let err = second.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Contention);
    assert_eq!(err.message, "Update in progress");

    assert_eq!(h.api.get_progress(user, course).await.unwrap().progress, 40);
    assert_eq!(h.api.progress_service().guard().in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn writes_to_one_user_do_not_lose_each_other() {
    let h = slow_harness(Duration::from_millis(50));
    let user = h.student("STU-2025-2005").await;
    let rust = h.course("Rust", "programming", 0);
    let go = h.course("Go", "programming", 1);
    let design = h.course("Design", "design", 2);

    let (a, b, c) = tokio::join!(
        h.api.update_progress(user, rust, 30, None),
        h.api.update_progress(user, go, 60, Some("goroutines")),
        h.api.wishlist_add(user, design),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    let enrollments = h.store.get_enrollments(user).await.unwrap();
    assert_eq!(enrollments.len(), 2);
    assert_eq!(enrollments.find(rust).unwrap().progress.value(), 30);
    assert_eq!(enrollments.find(go).unwrap().progress.value(), 60);
    assert!(h.store.get_wishlist(user).await.unwrap().contains(design));
}

#[tokio::test]
async fn guard_is_released_after_a_store_failure() {
    let h = harness();
    let user = h.student("STU-2025-2006").await;
    let course = h.course("Rust", "programming", 0);

    h.store.fail_next(StoreError::Network("connection reset".into()));
    let err = h
        .api
        .update_progress(user, course, 50, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Store);
    assert_eq!(err.message, messages::CONNECTION_LOST);

    let retried = h.api.update_progress(user, course, 50, None).await.unwrap();
    assert_eq!(retried.progress, 50);
}

#[tokio::test]
async fn unknown_user_surfaces_no_data_found() {
    let h = harness();
    let err = h
        .api
        .update_progress(UserKey::new(), CourseId::new(), 10, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Store);
    assert_eq!(err.message, messages::NO_DATA_FOUND);
}

#[tokio::test]
async fn blank_lesson_ids_are_rejected_before_the_store() {
    let h = harness();
    let user = h.student("STU-2025-2007").await;
    let course = h.course("Rust", "programming", 0);

    let err = h
        .api
        .update_progress(user, course, 10, Some("   "))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(h.store.get_enrollments(user).await.unwrap().is_empty());
    assert_eq!(h.api.progress_service().guard().in_flight(), 0);

    let retried = h
        .api
        .update_progress(user, course, 10, Some("intro"))
        .await
        .unwrap();
    assert_eq!(retried.progress, 10);
}
