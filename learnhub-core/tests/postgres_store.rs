#![cfg(feature = "pg-tests")]

use learnhub_core::database::{CoursesRepository, PostgresStore, UsersRepository};
use learnhub_core::model::{
    CourseId, Enrollments, LessonId, NewCourse, NewUser, ProgressPercent,
    UserRole, Wishlist,
};
use learnhub_core::query::CourseQueryBuilder;
use learnhub_core::StoreError;
use sqlx::PgPool;

fn student(login_id: &str) -> NewUser {
    NewUser {
        login_id: login_id.to_string(),
        role: UserRole::Student,
        full_name: None,
        email: None,
    }
}

#[sqlx::test(migrator = "learnhub_core::MIGRATOR")]
async fn enrollments_round_trip_through_jsonb(pool: PgPool) {
    let store = PostgresStore::new(pool);
    let user = store
        .create_user(&student("STU-2025-4001"), "$argon2id$stub")
        .await
        .unwrap();
    assert!(store.get_enrollments(user.id).await.unwrap().is_empty());

    let course = CourseId::new();
    let mut enrollments = Enrollments::new();
    enrollments.apply_progress(
        course,
        ProgressPercent::clamped(70),
        Some(LessonId::new("intro").unwrap()),
        chrono::Utc::now(),
    );
    store.replace_enrollments(user.id, &enrollments).await.unwrap();

    let loaded = store.get_enrollments(user.id).await.unwrap();
    assert_eq!(loaded.find(course).unwrap().progress.value(), 70);

    let mut wishlist = Wishlist::new();
    wishlist.insert(course);
    store.replace_wishlist(user.id, &wishlist).await.unwrap();
    assert!(store.get_wishlist(user.id).await.unwrap().contains(course));
}

#[sqlx::test(migrator = "learnhub_core::MIGRATOR")]
async fn missing_rows_and_duplicates_map_to_store_codes(pool: PgPool) {
    let store = PostgresStore::new(pool);
    let err = store
        .find_for_login("ghost", UserRole::Student)
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::NoRows);

    store
        .create_user(&student("STU-2025-4002"), "$argon2id$stub")
        .await
        .unwrap();
    let dup = store
        .create_user(&student("STU-2025-4002"), "$argon2id$stub")
        .await
        .unwrap_err();
    assert_eq!(dup.code(), Some("23505"));
}

#[sqlx::test(migrator = "learnhub_core::MIGRATOR")]
async fn search_counts_and_pages(pool: PgPool) {
    let store = PostgresStore::new(pool);
    for n in 0..5 {
        store
            .create_course(&NewCourse {
                title: format!("Rust {n}"),
                description: "Systems programming course".into(),
                category: "programming".into(),
                is_visible: true,
            })
            .await
            .unwrap();
    }

    let query = CourseQueryBuilder::new()
        .text("rust")
        .page(2)
        .page_size(2)
        .build()
        .unwrap();
    let found = store.search(&query).await.unwrap();
    assert_eq!(found.total, 5);
    assert_eq!(found.rows.len(), 2);
}
