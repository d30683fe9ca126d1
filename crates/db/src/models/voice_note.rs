//! Voice-note entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use voicenotes_core::types::{DbId, Timestamp};

/// A row from the `voice_notes` table.
///
/// `status` holds one of the `VoiceNoteStatus` names; parse with
/// `VoiceNoteStatus::from_name` before taking state-machine decisions.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VoiceNote {
    pub id: DbId,
    pub user_id: DbId,
    pub original_filename: String,
    pub stored_filename: String,
    pub file_size_bytes: i64,
    pub mime_type: Option<String>,
    pub duration_seconds: Option<f64>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a freshly uploaded voice note (status `uploaded`).
#[derive(Debug)]
pub struct CreateVoiceNote {
    pub user_id: DbId,
    pub original_filename: String,
    pub stored_filename: String,
    pub file_size_bytes: i64,
    pub mime_type: Option<String>,
}
