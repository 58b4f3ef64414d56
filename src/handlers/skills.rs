// handlers/skills.rs - Skills: GET/POST /skills, GET/PATCH/DELETE /skills/:id

use axum::Router;

use super::resource;
use crate::database::models::skill;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    resource::owned_routes("/skills", &skill::SPEC)
}
