mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{error_code, TestApp};

#[tokio::test]
async fn transactions_list_by_date_descending() {
    let app = TestApp::new();
    for (date, amount) in [("2025-01-05", 10), ("2025-03-01", 25), ("2025-02-14", 7)] {
        app.create(
            "/transactions",
            json!({ "email": "a@x.com", "date": date, "amount": amount, "type": "expense" }),
        )
        .await;
    }
    app.create("/transactions", json!({ "email": "b@x.com", "date": "2030-01-01", "amount": 1 }))
        .await;

    let (status, list) = app.get("/transactions/a@x.com").await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = list.as_array().unwrap().iter().map(|t| t["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2025-03-01", "2025-02-14", "2025-01-05"]);
}

#[tokio::test]
async fn transaction_delete_needs_owner() {
    let app = TestApp::new();
    let id = app
        .create("/transactions", json!({ "email": "a@x.com", "date": "2025-01-05", "amount": "12.50" }))
        .await;

    let (status, body) = app.delete(&format!("/transactions/{}", id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");

    let (status, _) = app.delete(&format!("/transactions/{}?email=b@x.com", id)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.delete(&format!("/transactions/{}?email=a@x.com", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedCount"], json!(1));
}
