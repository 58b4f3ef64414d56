// handlers/transactions.rs - Transactions
//   GET    /transactions/:email      newest date first
//   POST   /transactions
//   DELETE /transactions/:id?email=

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;

use super::resource;
use super::utils::{JsonBody, OwnerQuery};
use crate::database::models::transaction;
use crate::database::store::Document;
use crate::error::ApiError;
use crate::middleware::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create))
        // One segment, read as an email on GET and as an id on DELETE
        .route("/transactions/:key", get(list).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    resource::list_by_owner(&transaction::SPEC, state, Some(email)).await
}

async fn create(State(state): State<AppState>, JsonBody(body): JsonBody<Value>) -> ApiResult<Document> {
    resource::create(&transaction::SPEC, state, body).await
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Value> {
    resource::delete(&transaction::SPEC, state, id, query).await
}
