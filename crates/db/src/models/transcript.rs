//! Transcript and segment entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use voicenotes_core::types::{DbId, Timestamp};

/// A row from the `transcripts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transcript {
    pub id: DbId,
    pub voice_note_id: DbId,
    pub user_id: DbId,
    pub full_text: String,
    pub language: Option<String>,
    pub model_size: String,
    pub processing_time_seconds: f64,
    pub created_at: Timestamp,
}

/// A row from the `transcript_segments` table, ordered by `segment_index`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TranscriptSegment {
    pub id: DbId,
    pub transcript_id: DbId,
    pub segment_index: i32,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

/// A transcript joined with its voice note's display filename, as returned
/// by list and detail queries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TranscriptListItem {
    pub id: DbId,
    pub voice_note_id: DbId,
    pub original_filename: String,
    pub full_text: String,
    pub language: Option<String>,
    pub model_size: String,
    pub processing_time_seconds: f64,
    pub created_at: Timestamp,
}

/// DTO for inserting a transcript after a successful decode.
#[derive(Debug)]
pub struct CreateTranscript {
    pub voice_note_id: DbId,
    pub user_id: DbId,
    pub full_text: String,
    pub language: Option<String>,
    pub model_size: String,
    pub processing_time_seconds: f64,
}

/// A segment to insert alongside its parent transcript. `segment_index` is
/// the position in the model's produced order.
#[derive(Debug)]
pub struct NewSegment {
    pub segment_index: i32,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

/// Query parameters for `GET /api/v1/transcripts`.
#[derive(Debug, Deserialize)]
pub struct TranscriptListQuery {
    /// Case-insensitive substring match on the full text.
    pub search: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
