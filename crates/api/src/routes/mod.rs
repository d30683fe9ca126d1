//! Route tables, one module per resource. [`crate::router::build_app_router`]
//! nests them under `/api/v1` and applies the middleware stack.

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod health;
pub mod transcripts;
pub mod voice_notes;

/// All `/api/v1` routes merged into one router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/voice-notes", voice_notes::router())
        .nest("/transcripts", transcripts::router())
}
