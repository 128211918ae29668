mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_parent_resolves_child_by_name() {
    let app = TestApp::new();
    let child = app.student_named("Alex", "Thompson").await;
    app.student_named("Alex", "Other").await;
    let parent = app.parent_of("Alex Thompson").await;

    let (status, body) = app.get("/api/parents/child", &parent).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], child.id.to_string());
    assert!(body["data"].get("password").is_none());

    let (status, body) = app.get("/api/parents/child/attendance", &parent).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["total"], 0);
}

#[tokio::test]
async fn test_unmatched_child_is_not_found() {
    let app = TestApp::new();
    app.student_named("Alex", "Thompson").await;
    let parent = app.parent_of("Jamie Nobody").await;

    let (status, body) = app.get("/api/parents/child", &parent).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Child not found");

    let (status, _) = app.get("/api/parents/child/grades", &parent).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ambiguous_child_name_is_not_found() {
    let app = TestApp::new();
    app.student_named("Alex", "Thompson").await;
    app.student_named("Alex", "Thompson").await;
    let parent = app.parent_of("Alex Thompson").await;

    let (status, _) = app.get("/api/parents/child", &parent).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_child_views_are_parent_only() {
    let app = TestApp::new();
    let teacher = app.teacher().await;

    let (status, body) = app.get("/api/parents/child", &teacher).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].as_str().unwrap().contains("teacher"));
}

#[tokio::test]
async fn test_self_registered_parent_cannot_claim_a_child_by_id() {
    let app = TestApp::new();
    let victim = app.student_named("Robin", "Private").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "firstName": "Eve",
                "lastName": "Intruder",
                "email": "eve@school.com",
                "password": "secret123",
                "role": "parent",
                "childName": "Nobody Here",
                "phone": "555-0166",
                "childId": victim.id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["user"].get("childId").is_none());
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(Method::GET, "/api/parents/child", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Child not found");

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/api/grades/student/{}", victim.id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_can_link_child_by_id() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let child = app.student_named("Alex", "Thompson").await;
    let parent = app.parent_of("A. Thompson").await;

    let (status, _) = app
        .put(
            &format!("/api/users/{}", parent.id),
            &admin,
            json!({ "childId": child.id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/parents/child", &parent).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], child.id.to_string());
}
