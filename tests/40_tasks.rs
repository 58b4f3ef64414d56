mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{error_code, TestApp};

#[tokio::test]
async fn task_lifecycle() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/tasks", json!({ "subject": "Algebra", "deadline": "2025-03-01", "email": "a@x.com" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], json!("Task added successfully"));
    assert_eq!(body["data"]["isCompleted"], json!(false));
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, list) = app.get("/tasks?email=a@x.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let (status, body) = app
        .patch(&format!("/tasks/{}", id), json!({ "email": "a@x.com", "isCompleted": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isCompleted"], json!(true));
    assert_eq!(body["data"]["subject"], json!("Algebra"));

    let (status, body) = app.delete(&format!("/tasks/{}?email=a@x.com", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Task deleted successfully"));

    let (_, list) = app.get("/tasks?email=a@x.com").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn task_requires_subject_deadline_and_owner() {
    let app = TestApp::new();

    let (status, body) = app.post("/tasks", json!({ "subject": "Algebra" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
    assert!(body["field_errors"]["deadline"].is_string());
    assert!(body["field_errors"]["email"].is_string());
}

#[tokio::test]
async fn empty_patch_is_rejected() {
    let app = TestApp::new();
    let id = app
        .create("/tasks", json!({ "subject": "Algebra", "deadline": "2025-03-01", "email": "a@x.com" }))
        .await;

    let (status, body) = app.patch(&format!("/tasks/{}", id), json!({ "email": "a@x.com" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("No fields to update"));

    let (status, _) = app.patch(&format!("/tasks/{}", id), json!({ "isCompleted": true })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn padded_owner_still_owns_the_task() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/tasks", json!({ "subject": "Algebra", "deadline": "2025-03-01", "email": " a@x.com " }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], json!("a@x.com"));
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let (_, list) = app.get("/tasks?email=%20a@x.com%20").await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let (status, body) = app
        .patch(&format!("/tasks/{}", id), json!({ "email": " a@x.com ", "isCompleted": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isCompleted"], json!(true));

    let (status, _) = app.delete(&format!("/tasks/{}?email=%20a@x.com%20", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.count("tasks").await, 0);
}
