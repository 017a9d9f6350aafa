mod support;

use learnhub_core::model::{NewUser, UserRole};
use learnhub_core::{Envelope, ErrorKind};
use support::harness;

fn instructor(login_id: &str) -> NewUser {
    NewUser {
        login_id: login_id.to_string(),
        role: UserRole::Instructor,
        full_name: Some("Grace Hopper".into()),
        email: Some("grace@example.com".into()),
    }
}

#[tokio::test]
async fn register_then_login_with_role() {
    let h = harness();
    let created = h
        .api
        .register(instructor("ghopper"), "cobol-forever")
        .await
        .unwrap()
        .user;

    let login = h
        .api
        .login("ghopper", "cobol-forever", Some(UserRole::Instructor))
        .await
        .unwrap();
    assert_eq!(login.user.id, created.id);
    assert_eq!(login.user.current_streak, 1);

    let body = Envelope(&Ok(login)).to_value();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["user_id"], "ghopper");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn failures_are_normalized() {
    let h = harness();
    h.api
        .register(instructor("ghopper"), "cobol-forever")
        .await
        .unwrap();

    let missing = h.api.login("", "", None).await.unwrap_err();
    assert_eq!(missing.kind, ErrorKind::Validation);
    assert_eq!(missing.message, "Please provide user ID and password");

    // Default role is student.
    let wrong_role = h.api.login("ghopper", "cobol-forever", None).await.unwrap_err();
    assert_eq!(wrong_role.kind, ErrorKind::Unauthorized);
    assert_eq!(wrong_role.message, "Invalid credentials");

    let wrong_password = h
        .api
        .login("ghopper", "fortran", Some(UserRole::Instructor))
        .await
        .unwrap_err();
    assert_eq!(wrong_password, wrong_role);

    let body = Envelope::<()>(&Err(wrong_password)).to_value();
    assert_eq!(
        body,
        serde_json::json!({
            "success": false,
            "error": "Invalid credentials",
            "kind": "unauthorized"
        })
    );
}

#[tokio::test]
async fn duplicate_registration_reports_existing_record() {
    let h = harness();
    h.api
        .register(instructor("ghopper"), "cobol-forever")
        .await
        .unwrap();
    let err = h
        .api
        .register(instructor("ghopper"), "cobol-forever")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Store);
    assert_eq!(err.message, "This record already exists");
}

#[tokio::test]
async fn repeated_failures_are_rate_limited() {
    let h = harness();
    for _ in 0..5 {
        let err = h.api.login("nobody", "guess", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
    let err = h.api.login("nobody", "guess", None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RateLimited);
    assert!(err.message.starts_with("Too many attempts"));
}

#[tokio::test]
async fn invalid_course_drafts_never_reach_the_store() {
    let h = harness();
    let err = h
        .api
        .create_course(learnhub_core::model::NewCourse {
            title: "Go".into(),
            description: "short".into(),
            category: "programming".into(),
            is_visible: true,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(
        err.message,
        "Title must be at least 3 characters. Description must be at least 10 characters"
    );
}
