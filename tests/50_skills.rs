mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use common::{error_code, TestApp};

#[tokio::test]
async fn skill_defaults_and_progress_updates() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/skills", json!({ "email": "a@x.com", "skill": "Rust", "goal": "Ship a crate" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let skill = &body["data"];
    assert_eq!(skill["status"], json!("in-progress"));
    assert_eq!(skill["progress"], json!(0));
    assert!(skill["createdAt"].is_string());
    let id = skill["_id"].as_str().unwrap().to_string();
    let created_at = skill["createdAt"].clone();

    let (status, body) = app
        .patch(
            &format!("/skills/{}", id),
            json!({ "email": "a@x.com", "progress": 60, "createdAt": "2000-01-01T00:00:00.000Z" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["progress"], json!(60));
    assert_eq!(body["data"]["createdAt"], created_at);
}

#[tokio::test]
async fn progress_must_be_numeric() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/skills", json!({ "email": "a@x.com", "skill": "Rust", "goal": "Ship", "progress": "lots" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
    assert!(body["field_errors"]["progress"].is_string());
}

#[tokio::test]
async fn skills_list_newest_first() {
    let app = TestApp::new();
    let older = app.create("/skills", json!({ "email": "a@x.com", "skill": "Go", "goal": "g" })).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let newer = app.create("/skills", json!({ "email": "a@x.com", "skill": "Rust", "goal": "g" })).await;

    let (_, list) = app.get("/skills?email=a@x.com").await;
    let ids: Vec<&str> = list.as_array().unwrap().iter().map(|s| s["_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![newer.as_str(), older.as_str()]);
}

#[tokio::test]
async fn skills_are_isolated_per_owner() {
    let app = TestApp::new();
    let mine = app.create("/skills", json!({ "email": "a@x.com", "skill": "Rust", "goal": "g" })).await;
    app.create("/skills", json!({ "email": "b@x.com", "skill": "Go", "goal": "g" })).await;

    let (_, list) = app.get("/skills?email=a@x.com").await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["_id"], json!(mine));

    let (status, body) = app.get(&format!("/skills/{}?email=a@x.com", mine)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["skill"], json!("Rust"));

    let (status, body) = app.get(&format!("/skills/{}?email=b@x.com", mine)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}
