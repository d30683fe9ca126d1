//! Repository for the `voice_notes` table. All reads are scoped by owner.

use sqlx::PgPool;
use voicenotes_core::status::VoiceNoteStatus;
use voicenotes_core::types::DbId;

use crate::models::voice_note::{CreateVoiceNote, VoiceNote};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, original_filename, stored_filename, file_size_bytes, \
                       mime_type, duration_seconds, status, created_at, updated_at";

/// Provides owner-scoped CRUD and status transitions for voice notes.
pub struct VoiceNoteRepo;

impl VoiceNoteRepo {
    /// Insert a freshly uploaded note (status defaults to `uploaded`).
    pub async fn create(pool: &PgPool, input: &CreateVoiceNote) -> Result<VoiceNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO voice_notes
                (user_id, original_filename, stored_filename, file_size_bytes, mime_type)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VoiceNote>(&query)
            .bind(input.user_id)
            .bind(&input.original_filename)
            .bind(&input.stored_filename)
            .bind(input.file_size_bytes)
            .bind(&input.mime_type)
            .fetch_one(pool)
            .await
    }

    /// List a user's notes, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<VoiceNote>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM voice_notes WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, VoiceNote>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find a single note by id, scoped to its owner.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<VoiceNote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM voice_notes WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, VoiceNote>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Persist a status transition.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: VoiceNoteStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE voice_notes SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.name())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a note `completed`, backfilling the duration when the model
    /// reported one.
    pub async fn mark_completed(
        pool: &PgPool,
        id: DbId,
        duration_seconds: Option<f64>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE voice_notes SET
                status = 'completed',
                duration_seconds = COALESCE($2, duration_seconds),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(duration_seconds)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete a note row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM voice_notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
