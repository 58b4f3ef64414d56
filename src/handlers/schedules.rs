// handlers/schedules.rs - Schedules: GET/POST /schedules, GET/PATCH/DELETE /schedules/:id

use axum::Router;

use super::resource;
use crate::database::models::schedule;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    resource::owned_routes("/schedules", &schedule::SPEC)
}
