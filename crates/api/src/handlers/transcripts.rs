//! Transcript handlers: search/list, detail with segments, plain-text
//! download.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use voicenotes_core::error::CoreError;
use voicenotes_core::transcript::{render_download_text, ExportInput, ExportSegment};
use voicenotes_core::types::DbId;
use voicenotes_db::models::transcript::{
    TranscriptListItem, TranscriptListQuery, TranscriptSegment,
};
use voicenotes_db::repositories::TranscriptRepo;

use crate::error::{ApiResult, AppError};
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// List page plus the total match count, independent of the page window.
#[derive(Debug, Serialize)]
pub struct TranscriptListResponse {
    pub data: Vec<TranscriptListItem>,
    pub total: i64,
}

/// A transcript joined with its ordered segments.
#[derive(Debug, Serialize)]
pub struct TranscriptDetail {
    #[serde(flatten)]
    pub transcript: TranscriptListItem,
    pub segments: Vec<TranscriptSegment>,
}

/// GET /api/v1/transcripts
///
/// Optional `search` does a case-insensitive substring match on the full
/// text; `limit`/`offset` page the results (newest first).
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TranscriptListQuery>,
) -> ApiResult<Json<TranscriptListResponse>> {
    let (data, total) = TranscriptRepo::search_for_user(
        &state.pool,
        auth.user_id,
        query.search.as_deref(),
        query.limit,
        query.offset,
    )
    .await?;

    Ok(Json(TranscriptListResponse { data, total }))
}

/// GET /api/v1/transcripts/{id}
pub async fn detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> ApiResult<Json<DataResponse<TranscriptDetail>>> {
    let (transcript, segments) = find_owned_with_segments(&state, id, auth.user_id).await?;
    Ok(Json(DataResponse::new(TranscriptDetail {
        transcript,
        segments,
    })))
}

/// GET /api/v1/transcripts/{id}/download
///
/// Plain-text rendering served as an attachment named after the original
/// recording (extension swapped for `.txt`).
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> ApiResult<Response> {
    let (transcript, segments) = find_owned_with_segments(&state, id, auth.user_id).await?;

    let body = render_download_text(&ExportInput {
        original_filename: &transcript.original_filename,
        language: transcript.language.as_deref(),
        model_size: &transcript.model_size,
        created_at: transcript.created_at,
        segments: segments
            .iter()
            .map(|seg| ExportSegment {
                start_time: seg.start_time,
                text: &seg.text,
            })
            .collect(),
        full_text: &transcript.full_text,
    });

    let download_name = format!("{}.txt", file_stem(&transcript.original_filename));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{download_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}

async fn find_owned_with_segments(
    state: &AppState,
    id: DbId,
    user_id: DbId,
) -> Result<(TranscriptListItem, Vec<TranscriptSegment>), AppError> {
    let transcript = TranscriptRepo::find_detail_for_user(&state.pool, id, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "transcript",
                id,
            })
        })?;

    let segments = TranscriptRepo::segments(&state.pool, transcript.id).await?;
    Ok((transcript, segments))
}

/// Filename with its last extension removed; quotes are stripped so the
/// value is safe inside a quoted `Content-Disposition` parameter.
fn file_stem(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    };
    stem.replace('"', "")
}
