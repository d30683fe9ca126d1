//! Repository for transcripts and their segments.
//!
//! A transcript and its segments are only ever written together, after the
//! full decode has succeeded, inside a single transaction.

use sqlx::PgPool;
use voicenotes_core::types::DbId;

use crate::models::transcript::{
    CreateTranscript, NewSegment, Transcript, TranscriptListItem, TranscriptSegment,
};
use crate::repositories::{clamp_limit, clamp_offset};

/// Column list for the `transcripts` table.
const COLUMNS: &str = "id, voice_note_id, user_id, full_text, language, model_size, \
                       processing_time_seconds, created_at";

/// Joined column list for list/detail queries (includes the display filename).
const JOINED_COLUMNS: &str = "t.id, t.voice_note_id, vn.original_filename, t.full_text, \
                              t.language, t.model_size, t.processing_time_seconds, t.created_at";

/// Provides owner-scoped reads and atomic transcript+segments insertion.
pub struct TranscriptRepo;

impl TranscriptRepo {
    /// Insert a transcript row and all its segment rows in one transaction.
    ///
    /// `segments` must already be in model-produced order; their
    /// `segment_index` fields carry that order.
    pub async fn create_with_segments(
        pool: &PgPool,
        input: &CreateTranscript,
        segments: &[NewSegment],
    ) -> Result<Transcript, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO transcripts
                (voice_note_id, user_id, full_text, language, model_size, processing_time_seconds)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let transcript = sqlx::query_as::<_, Transcript>(&query)
            .bind(input.voice_note_id)
            .bind(input.user_id)
            .bind(&input.full_text)
            .bind(&input.language)
            .bind(&input.model_size)
            .bind(input.processing_time_seconds)
            .fetch_one(&mut *tx)
            .await?;

        for seg in segments {
            sqlx::query(
                "INSERT INTO transcript_segments
                    (transcript_id, segment_index, start_time, end_time, text)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(transcript.id)
            .bind(seg.segment_index)
            .bind(seg.start_time)
            .bind(seg.end_time)
            .bind(&seg.text)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(transcript)
    }

    /// Search a user's transcripts with an optional case-insensitive
    /// substring match on the full text. Returns the page plus the total
    /// count computed independently of the page window.
    pub async fn search_for_user(
        pool: &PgPool,
        user_id: DbId,
        search: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<(Vec<TranscriptListItem>, i64), sqlx::Error> {
        // An empty search string means "no filter"; ILIKE %% matches all.
        let pattern = format!("%{}%", search.unwrap_or(""));
        let limit = clamp_limit(limit);
        let offset = clamp_offset(offset);

        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM transcripts t
             JOIN voice_notes vn ON vn.id = t.voice_note_id
             WHERE t.user_id = $1 AND t.full_text ILIKE $2
             ORDER BY t.created_at DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, TranscriptListItem>(&query)
            .bind(user_id)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM transcripts WHERE user_id = $1 AND full_text ILIKE $2",
        )
        .bind(user_id)
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        Ok((items, total))
    }

    /// Fetch a transcript (joined with its display filename) by id, scoped
    /// to its owner.
    pub async fn find_detail_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<TranscriptListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM transcripts t
             JOIN voice_notes vn ON vn.id = t.voice_note_id
             WHERE t.id = $1 AND t.user_id = $2"
        );
        sqlx::query_as::<_, TranscriptListItem>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the transcript for a specific voice note, scoped to its owner.
    pub async fn find_by_voice_note(
        pool: &PgPool,
        voice_note_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Transcript>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM transcripts WHERE voice_note_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Transcript>(&query)
            .bind(voice_note_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a transcript's segments ordered by `segment_index` ascending.
    pub async fn segments(
        pool: &PgPool,
        transcript_id: DbId,
    ) -> Result<Vec<TranscriptSegment>, sqlx::Error> {
        sqlx::query_as::<_, TranscriptSegment>(
            "SELECT id, transcript_id, segment_index, start_time, end_time, text
             FROM transcript_segments
             WHERE transcript_id = $1
             ORDER BY segment_index ASC",
        )
        .bind(transcript_id)
        .fetch_all(pool)
        .await
    }
}
