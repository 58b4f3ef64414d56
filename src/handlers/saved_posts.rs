// handlers/saved_posts.rs - Saved posts
//   POST   /savedPosts              body {postId, userEmail}
//   GET    /savedPosts/:email
//   DELETE /savedPosts/:id?email=

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;

use super::resource;
use super::utils::{JsonBody, OwnerQuery};
use crate::database::models::saved_post;
use crate::database::store::Document;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::PostService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/savedPosts", post(save_post))
        // One segment, read as an email on GET and as an id on DELETE
        .route("/savedPosts/:key", get(list).delete(remove))
}

async fn save_post(State(state): State<AppState>, JsonBody(body): JsonBody<Value>) -> ApiResult<Document> {
    let doc = PostService::new(state.store()).save_post(body).await?;
    Ok(ApiResponse::created(doc).message("Post saved successfully"))
}

async fn list(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    resource::list_by_owner(&saved_post::SPEC, state, Some(email)).await
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Value> {
    resource::delete(&saved_post::SPEC, state, id, query).await
}
