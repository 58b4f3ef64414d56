// handlers/tasks.rs - Tasks: GET/POST /tasks, GET/PATCH/DELETE /tasks/:id

use axum::Router;

use super::resource;
use crate::database::models::task;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    resource::owned_routes("/tasks", &task::SPEC)
}
