mod common;

use axum::http::StatusCode;
use common::TestApp;
use schoolhouse_db::Filter;
use schoolhouse_models::Message;
use serde_json::json;

#[tokio::test]
async fn test_non_participant_cannot_post_or_read() {
    let app = TestApp::new();
    let teacher = app.teacher().await;
    let parent = app.parent_of("Sam Student").await;
    let outsider = app.student().await;

    let (status, body) = app
        .post("/api/conversations", &teacher, json!({ "participantIds": [parent.id] }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/conversations/{id}/messages");

    let (status, body) = app.post(&uri, &outsider, json!({ "content": "hello" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized to message in this conversation");

    let (status, _) = app.get(&uri, &outsider).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let stored: Vec<Message> = app.store().find(&Filter::new()).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_participants_exchange_messages_in_order() {
    let app = TestApp::new();
    let teacher = app.teacher().await;
    let parent = app.parent_of("Sam Student").await;

    let (_, body) = app
        .post("/api/conversations", &teacher, json!({ "participantIds": [parent.id] }))
        .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/conversations/{id}/messages");

    let (status, _) = app.post(&uri, &teacher, json!({ "content": "first" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.post(&uri, &parent, json!({ "content": "second" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.get(&uri, &parent).await;
    assert_eq!(status, StatusCode::OK);
    let contents: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["first", "second"]);

    let (_, listed) = app.get("/api/conversations", &parent).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_same_participants_reuse_the_conversation() {
    let app = TestApp::new();
    let teacher = app.teacher().await;
    let parent = app.parent_of("Sam Student").await;

    let (status, first) = app
        .post("/api/conversations", &teacher, json!({ "participantIds": [parent.id] }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, second) = app
        .post(
            "/api/conversations",
            &parent,
            json!({ "participantIds": [teacher.id, parent.id] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["id"], second["data"]["id"]);

    let (status, _) = app
        .post("/api/conversations", &teacher, json!({ "participantIds": [teacher.id] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
