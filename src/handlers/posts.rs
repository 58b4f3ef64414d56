// handlers/posts.rs - Posts
//   POST   /addPosts
//   GET    /getAllPosts
//   GET    /getUserPosts/:email
//   DELETE /posts/:id            (cascades to saved posts)
//   POST   /posts/:id/like       (404 missing post, 400 CONFLICT if already liked)
//   POST   /posts/:id/unlike     (404 when the post does not exist)

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde_json::Value;

use super::utils::JsonBody;
use crate::database::models::post::{self, LikeInput};
use crate::database::repository::Repository;
use crate::database::store::Document;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{DeleteSummary, PostService};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addPosts", post(add_post))
        .route("/getAllPosts", get(all_posts))
        .route("/getUserPosts/:email", get(user_posts))
        .route("/posts/:id", delete(delete_post))
        .route("/posts/:id/like", post(like_post))
        .route("/posts/:id/unlike", post(unlike_post))
}

async fn add_post(State(state): State<AppState>, JsonBody(body): JsonBody<Value>) -> ApiResult<Document> {
    let doc = Repository::new(&post::SPEC, state.store()).create(body).await?;
    Ok(ApiResponse::created(doc).message("Post added successfully"))
}

async fn all_posts(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let posts = Repository::new(&post::SPEC, state.store()).list_all().await?;
    Ok(Json(posts))
}

async fn user_posts(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let posts = Repository::new(&post::SPEC, state.store())
        .list_by_owner(Some(email.as_str()))
        .await?;
    Ok(Json(posts))
}

async fn delete_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<DeleteSummary> {
    let summary = PostService::new(state.store()).delete_post(&id).await?;
    Ok(ApiResponse::success(summary).message("Post and related saved posts deleted"))
}

async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<LikeInput>,
) -> ApiResult<Document> {
    let doc = PostService::new(state.store())
        .like(&id, input.user_email.as_deref())
        .await?;
    Ok(ApiResponse::success(doc).message("Post liked"))
}

async fn unlike_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<LikeInput>,
) -> ApiResult<Document> {
    let doc = PostService::new(state.store())
        .unlike(&id, input.user_email.as_deref())
        .await?;
    Ok(ApiResponse::success(doc).message("Post unliked"))
}
