//! Brainbox API: owner-scoped CRUD over schemaless document collections
//! (posts, saved posts, schedules, transactions, tasks, skills, exam routines).

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

pub use app::app;
pub use error::ApiError;
pub use state::AppState;
