//! Voice-note route table. Every route requires authentication via the
//! [`crate::middleware::AuthUser`] extractor on its handler.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::voice_notes;
use crate::state::AppState;

/// Routes (nested under `/api/v1/voice-notes`):
/// - `POST   /` -- multipart upload of a new recording
/// - `GET    /` -- list the caller's notes, newest first
/// - `GET    /{id}` -- fetch one note
/// - `DELETE /{id}` -- delete a note, its transcript, and its file
/// - `POST   /{id}/transcribe` -- run transcription, returns the transcript
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(voice_notes::upload).get(voice_notes::list))
        .route(
            "/{id}",
            get(voice_notes::detail).delete(voice_notes::delete),
        )
        .route("/{id}/transcribe", post(voice_notes::transcribe))
}
