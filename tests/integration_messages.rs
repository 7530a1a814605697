#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, unreachable_pub)]
use common::{TestApp, VALID_CONTENT, id_of};
use reqwest::{StatusCode, header};
use serde_json::{Value, json};
use uuid::Uuid;

mod common;

#[tokio::test]
async fn test_create_and_fetch_message() {
    let app = TestApp::spawn().await;
    let org = Uuid::new_v4();

    let resp = app.create_message(org, "Valid Title", VALID_CONTENT).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_string();
    let body: Value = resp.json().await.unwrap();
    let id = id_of(&body);

    assert_eq!(location, format!("/api/v1/organizations/{org}/messages/{id}"));
    assert_eq!(body["isActive"], true);
    assert_eq!(body["title"], "Valid Title");
    assert_eq!(body["organizationId"], org.to_string());
    assert!(body["updatedAt"].is_null());

    let resp = app.client.get(format!("{}{}", app.server_url, location)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_create_duplicate_title_conflicts() {
    let app = TestApp::spawn().await;
    let org = Uuid::new_v4();
    app.create_valid(org, "Duplicate").await;

    let resp = app.create_message(org, "Duplicate", "Different but still valid content").await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Title must be unique per organization");
    assert_eq!(app.repo.len(), 1);
}

#[tokio::test]
async fn test_create_short_content_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app.create_message(Uuid::new_v4(), "Valid Title", "Short").await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"]["content"], json!(["Content must be between 10 and 1000 characters"]));
    assert!(body["errors"].get("title").is_none());
    assert!(app.repo.is_empty());
}

#[tokio::test]
async fn test_create_reports_every_invalid_field() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.messages_url(Uuid::nil()))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    let errors = body["errors"].as_object().unwrap();
    assert!(errors.contains_key("organizationId"));
    assert!(errors.contains_key("title"));
    assert!(errors.contains_key("content"));
}

#[tokio::test]
async fn test_create_malformed_json_is_bad_request() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.messages_url(Uuid::new_v4()))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_path_id_is_json_bad_request() {
    let app = TestApp::spawn().await;
    let org = Uuid::new_v4();

    let urls = [
        format!("{}/api/v1/organizations/not-a-uuid/messages", app.server_url),
        format!("{}/api/v1/organizations/{org}/messages/42", app.server_url),
    ];

    for url in urls {
        let resp = app.client.get(&url).send().await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{url}");
        let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
        assert!(content_type.starts_with("application/json"), "{content_type}");
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("Invalid path"), "{body}");
    }

    let resp =
        app.client.delete(format!("{}/api/v1/organizations/{org}/messages/42", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_messages_is_scoped_to_organization() {
    let app = TestApp::spawn().await;
    let org = Uuid::new_v4();
    let other = Uuid::new_v4();
    app.create_valid(org, "First").await;
    app.create_valid(org, "Second").await;
    app.create_valid(other, "First").await;

    let resp = app.client.get(app.messages_url(org)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(body.len(), 2);
    assert!(body.iter().all(|m| m["organizationId"] == org.to_string()));

    let resp = app.client.get(app.messages_url(Uuid::new_v4())).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Vec<Value> = resp.json().await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_list_messages_nil_organization() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.messages_url(Uuid::nil())).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"]["organizationId"], json!(["OrganizationId is required"]));
}

#[tokio::test]
async fn test_get_missing_message_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app.get_message(Uuid::new_v4(), Uuid::new_v4()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Message not found");
}

#[tokio::test]
async fn test_get_message_with_nil_id() {
    let app = TestApp::spawn().await;

    let resp = app.get_message(Uuid::new_v4(), Uuid::nil()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"]["id"], json!(["OrganizationId and MessageId are required"]));
}

#[tokio::test]
async fn test_get_message_from_another_organization_is_not_found() {
    let app = TestApp::spawn().await;
    let created = app.create_valid(Uuid::new_v4(), "Private").await;

    let resp = app.get_message(Uuid::new_v4(), id_of(&created)).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_message() {
    let app = TestApp::spawn().await;
    let org = Uuid::new_v4();
    let id = id_of(&app.create_valid(org, "Original").await);

    let resp = app
        .update_message(org, id, &json!({ "title": "Renamed", "content": "Rewritten content body", "isActive": true }))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let body: Value = app.get_message(org, id).await.json().await.unwrap();
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["title"], "Renamed");
    assert_eq!(body["content"], "Rewritten content body");
    assert!(body["updatedAt"].is_string());
}

#[tokio::test]
async fn test_update_keeping_own_title_succeeds() {
    let app = TestApp::spawn().await;
    let org = Uuid::new_v4();
    let id = id_of(&app.create_valid(org, "Stable").await);

    let resp =
        app.update_message(org, id, &json!({ "title": "Stable", "content": "New content, same title" })).await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_update_to_taken_title_is_internal_error() {
    let app = TestApp::spawn().await;
    let org = Uuid::new_v4();
    app.create_valid(org, "Taken").await;
    let id = id_of(&app.create_valid(org, "Mine").await);

    let resp = app.update_message(org, id, &json!({ "title": "Taken", "content": VALID_CONTENT })).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error["error"], "Internal server error");
    let body: Value = app.get_message(org, id).await.json().await.unwrap();
    assert_eq!(body["title"], "Mine");
}

#[tokio::test]
async fn test_update_missing_message_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app
        .update_message(Uuid::new_v4(), Uuid::new_v4(), &json!({ "title": "Valid Title", "content": VALID_CONTENT }))
        .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_inactive_message_is_rejected() {
    let app = TestApp::spawn().await;
    let org = Uuid::new_v4();
    let seeded = app.seed_inactive(org, "Dormant");

    let resp = app
        .update_message(org, seeded.id, &json!({ "title": "Dormant", "content": VALID_CONTENT, "isActive": true }))
        .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"]["isActive"], json!(["Inactive messages cannot be updated"]));
    assert_eq!(app.repo.get(seeded.id), Some(seeded));
}

#[tokio::test]
async fn test_update_invalid_fields() {
    let app = TestApp::spawn().await;
    let org = Uuid::new_v4();
    let id = id_of(&app.create_valid(org, "Original").await);

    let resp = app.update_message(org, id, &json!({ "title": "ab", "content": "c".repeat(1001) })).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["errors"].get("title").is_some());
    assert!(body["errors"].get("content").is_some());
}

#[tokio::test]
async fn test_deactivated_message_is_frozen_but_readable() {
    let app = TestApp::spawn().await;
    let org = Uuid::new_v4();
    let id = id_of(&app.create_valid(org, "Soon inactive").await);

    let resp =
        app.update_message(org, id, &json!({ "title": "Soon inactive", "content": VALID_CONTENT, "isActive": false })).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.get_message(org, id).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["isActive"], false);

    let resp = app.delete_message(org, id).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"]["isActive"], json!(["Inactive messages cannot be deleted"]));

    // The inactive title still blocks reuse.
    let resp = app.create_message(org, "Soon inactive", VALID_CONTENT).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_message() {
    let app = TestApp::spawn().await;
    let org = Uuid::new_v4();
    let id = id_of(&app.create_valid(org, "Doomed").await);

    let resp = app.delete_message(org, id).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.get_message(org, id).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.delete_message(org, id).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_message_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app.delete_message(Uuid::new_v4(), Uuid::new_v4()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Message not found");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.messages_url(Uuid::new_v4()))
        .header("x-request-id", "test-request-42")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "test-request-42");

    let resp = app.client.get(app.messages_url(Uuid::new_v4())).send().await.unwrap();
    assert!(resp.headers().get("x-request-id").is_some());
}
