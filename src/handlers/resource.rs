// handlers/resource.rs - generic owner-scoped CRUD handlers
//
// Each resource module instantiates these with its ResourceSpec. Routes:
//   GET    {base}?email=      list the owner's documents
//   POST   {base}             create (owner taken from the body)
//   GET    {base}/:id?email=  fetch one owned document
//   PATCH  {base}/:id         partial update (owner from body, else ?email=)
//   DELETE {base}/:id?email=  delete one owned document

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};

use super::utils::{owner_from, JsonBody, OwnerQuery};
use crate::database::models::ResourceSpec;
use crate::database::repository::Repository;
use crate::database::store::Document;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn list_by_owner(
    spec: &'static ResourceSpec,
    state: AppState,
    owner: Option<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let docs = Repository::new(spec, state.store())
        .list_by_owner(owner.as_deref())
        .await?;
    Ok(Json(docs))
}

pub async fn create(spec: &'static ResourceSpec, state: AppState, body: Value) -> ApiResult<Document> {
    let doc = Repository::new(spec, state.store()).create(body).await?;
    Ok(ApiResponse::created(doc).message(format!("{} added successfully", spec.label)))
}

pub async fn get_owned(
    spec: &'static ResourceSpec,
    state: AppState,
    id: String,
    query: OwnerQuery,
) -> ApiResult<Document> {
    let doc = Repository::new(spec, state.store())
        .get(&id, query.email.as_deref())
        .await?;
    Ok(ApiResponse::success(doc))
}

pub async fn update(
    spec: &'static ResourceSpec,
    state: AppState,
    id: String,
    query: OwnerQuery,
    body: Value,
) -> ApiResult<Document> {
    let owner = owner_from(&body, spec.owner_field(), &query);
    let doc = Repository::new(spec, state.store())
        .update(&id, owner.as_deref(), body)
        .await?;
    Ok(ApiResponse::success(doc).message(format!("{} updated successfully", spec.label)))
}

pub async fn delete(
    spec: &'static ResourceSpec,
    state: AppState,
    id: String,
    query: OwnerQuery,
) -> ApiResult<Value> {
    let deleted = Repository::new(spec, state.store())
        .delete(&id, query.email.as_deref())
        .await?;
    Ok(ApiResponse::success(json!({ "deletedCount": deleted }))
        .message(format!("{} deleted successfully", spec.label)))
}

/// Full route set for a resource whose owner arrives as `email`.
pub fn owned_routes(base: &str, spec: &'static ResourceSpec) -> Router<AppState> {
    Router::new()
        .route(
            base,
            get(move |State(state): State<AppState>, Query(query): Query<OwnerQuery>| {
                list_by_owner(spec, state, query.email)
            })
            .post(move |State(state): State<AppState>, JsonBody(body): JsonBody<Value>| {
                create(spec, state, body)
            }),
        )
        .route(
            &format!("{}/:id", base),
            get(
                move |State(state): State<AppState>,
                      Path(id): Path<String>,
                      Query(query): Query<OwnerQuery>| { get_owned(spec, state, id, query) },
            )
            .patch(
                move |State(state): State<AppState>,
                      Path(id): Path<String>,
                      Query(query): Query<OwnerQuery>,
                      JsonBody(body): JsonBody<Value>| { update(spec, state, id, query, body) },
            )
            .delete(
                move |State(state): State<AppState>,
                      Path(id): Path<String>,
                      Query(query): Query<OwnerQuery>| { delete(spec, state, id, query) },
            ),
        )
}
