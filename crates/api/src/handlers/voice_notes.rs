//! Voice-note handlers: upload, list, detail, delete, transcribe.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use voicenotes_core::error::CoreError;
use voicenotes_core::status::VoiceNoteStatus;
use voicenotes_core::types::DbId;
use voicenotes_core::upload::validate_upload_metadata;
use voicenotes_db::models::transcript::Transcript;
use voicenotes_db::models::voice_note::{CreateVoiceNote, VoiceNote};
use voicenotes_db::repositories::VoiceNoteRepo;

use crate::engine::run_transcription;
use crate::error::{ApiResult, AppError};
use crate::middleware::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;
use crate::storage::{remove_stored_file, store_field};

/// POST /api/v1/voice-notes
///
/// Accepts a multipart form with a `file` field. Metadata is validated
/// before any bytes hit disk; the size cap is enforced while streaming. On
/// any failure after storage begins, the partial file is removed and no row
/// is inserted.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<DataResponse<VoiceNote>>)> {
    let mut field = loop {
        match multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("invalid multipart request: {e}")))?
        {
            Some(field) if field.name() == Some("file") => break field,
            Some(_) => continue,
            None => {
                return Err(CoreError::Validation("No file provided".into()).into());
            }
        }
    };

    let original_filename = field
        .file_name()
        .map(str::to_string)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("No filename provided".into())))?;
    let mime_type = field.content_type().map(str::to_string);

    if let Some(reason) = validate_upload_metadata(&original_filename, mime_type.as_deref()) {
        return Err(CoreError::Validation(reason).into());
    }

    let user_dir = state.config.upload.user_dir(auth.user_id);
    let stored = store_field(&mut field, &original_filename, &user_dir, &state.config.upload).await?;

    let note = match VoiceNoteRepo::create(
        &state.pool,
        &CreateVoiceNote {
            user_id: auth.user_id,
            original_filename,
            stored_filename: stored.stored_filename,
            file_size_bytes: stored.size_bytes as i64,
            mime_type,
        },
    )
    .await
    {
        Ok(note) => note,
        Err(e) => {
            // Insert failed after the bytes landed; don't leave an orphan.
            remove_stored_file(&stored.path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = auth.user_id,
        voice_note_id = note.id,
        size_bytes = note.file_size_bytes,
        "voice note uploaded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(note))))
}

/// GET /api/v1/voice-notes
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DataResponse<Vec<VoiceNote>>>> {
    let notes = VoiceNoteRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(notes)))
}

/// GET /api/v1/voice-notes/{id}
pub async fn detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> ApiResult<Json<DataResponse<VoiceNote>>> {
    let note = find_owned(&state, id, auth.user_id).await?;
    Ok(Json(DataResponse::new(note)))
}

/// DELETE /api/v1/voice-notes/{id}
///
/// The row goes first; transcript and segments follow via cascade. File
/// removal is best effort after the commit, so a crash in between leaves an
/// orphan file rather than a dangling row.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> ApiResult<Json<MessageResponse>> {
    let note = find_owned(&state, id, auth.user_id).await?;

    VoiceNoteRepo::delete(&state.pool, note.id).await?;

    let path = state
        .config
        .upload
        .user_dir(auth.user_id)
        .join(&note.stored_filename);
    remove_stored_file(&path).await;

    tracing::info!(user_id = auth.user_id, voice_note_id = id, "voice note deleted");

    Ok(Json(MessageResponse::new("Voice note deleted")))
}

/// POST /api/v1/voice-notes/{id}/transcribe
///
/// Synchronous: the response carries the finished transcript. Only notes in
/// `uploaded` or `failed` may be transcribed; anything else is a conflict
/// reported as a 400.
pub async fn transcribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> ApiResult<Json<DataResponse<Transcript>>> {
    let note = find_owned(&state, id, auth.user_id).await?;

    let status = VoiceNoteStatus::from_name(&note.status)?;
    if !status.can_transcribe() {
        return Err(CoreError::Validation(format!(
            "Cannot transcribe note with status '{status}'"
        ))
        .into());
    }

    let transcript = run_transcription(&state, &note).await?;
    Ok(Json(DataResponse::new(transcript)))
}

/// Ownership-scoped fetch; a note belonging to someone else is
/// indistinguishable from a missing one.
async fn find_owned(state: &AppState, id: DbId, user_id: DbId) -> Result<VoiceNote, AppError> {
    VoiceNoteRepo::find_for_user(&state.pool, id, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "voice note",
                id,
            })
        })
}
