//! Transcript route table. Read-only; transcripts are created through the
//! voice-note transcribe endpoint.

use axum::routing::get;
use axum::Router;

use crate::handlers::transcripts;
use crate::state::AppState;

/// Routes (nested under `/api/v1/transcripts`):
/// - `GET /` -- search/list the caller's transcripts
/// - `GET /{id}` -- fetch one transcript with its segments
/// - `GET /{id}/download` -- plain-text export as an attachment
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(transcripts::list))
        .route("/{id}", get(transcripts::detail))
        .route("/{id}/download", get(transcripts::download))
}
