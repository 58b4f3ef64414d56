// handlers/exam_routines.rs - Exam routines: GET/POST /exam-routines, GET/PATCH/DELETE /exam-routines/:id

use axum::Router;

use super::resource;
use crate::database::models::exam_routine;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    resource::owned_routes("/exam-routines", &exam_routine::SPEC)
}
