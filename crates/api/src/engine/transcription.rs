//! The transcription driver: runs the engine against a stored note and
//! persists the result, moving the note through its status transitions.
//!
//! Status flow: `transcribing` is set before the engine runs; success lands
//! on `completed` with the transcript committed, any failure lands on
//! `failed` with no transcript row. A note never stays in `transcribing`
//! past the end of this function.

use std::time::Instant;

use voicenotes_core::status::VoiceNoteStatus;
use voicenotes_core::transcript::assemble_full_text;
use voicenotes_db::models::transcript::{CreateTranscript, NewSegment, Transcript};
use voicenotes_db::models::voice_note::VoiceNote;
use voicenotes_db::repositories::{TranscriptRepo, VoiceNoteRepo};

use crate::error::AppError;
use crate::state::AppState;

/// Transcribe a stored voice note and persist the transcript.
///
/// The caller has already verified ownership and that the note's current
/// status permits transcription.
pub async fn run_transcription(
    state: &AppState,
    note: &VoiceNote,
) -> Result<Transcript, AppError> {
    VoiceNoteRepo::set_status(&state.pool, note.id, VoiceNoteStatus::Transcribing).await?;

    match transcribe_and_persist(state, note).await {
        Ok(transcript) => Ok(transcript),
        Err(err) => {
            tracing::error!(
                voice_note_id = note.id,
                error = %err,
                "transcription failed"
            );
            // Best effort; if this also fails the note is stuck in
            // `transcribing` and can be retried after a manual reset.
            if let Err(e) =
                VoiceNoteRepo::set_status(&state.pool, note.id, VoiceNoteStatus::Failed).await
            {
                tracing::error!(voice_note_id = note.id, error = %e, "failed to mark note failed");
            }
            Err(err)
        }
    }
}

async fn transcribe_and_persist(
    state: &AppState,
    note: &VoiceNote,
) -> Result<Transcript, AppError> {
    let audio_path = state
        .config
        .upload
        .user_dir(note.user_id)
        .join(&note.stored_filename);

    let started = Instant::now();
    let output = state.engine.transcribe(&audio_path).await?;
    let processing_time_seconds = round2(started.elapsed().as_secs_f64());

    tracing::info!(
        voice_note_id = note.id,
        segments = output.segments.len(),
        language = output.language.as_deref().unwrap_or("unknown"),
        processing_time_seconds,
        "transcription finished"
    );

    let full_text = assemble_full_text(output.segments.iter().map(|s| s.text.as_str()));

    let segments: Vec<NewSegment> = output
        .segments
        .iter()
        .enumerate()
        .map(|(i, seg)| NewSegment {
            segment_index: i as i32,
            start_time: seg.start_time,
            end_time: seg.end_time,
            text: seg.text.trim().to_string(),
        })
        .collect();

    let transcript = TranscriptRepo::create_with_segments(
        &state.pool,
        &CreateTranscript {
            voice_note_id: note.id,
            user_id: note.user_id,
            full_text,
            language: output.language,
            model_size: state.config.whisper.model_size.clone(),
            processing_time_seconds,
        },
        &segments,
    )
    .await?;

    VoiceNoteRepo::mark_completed(&state.pool, note.id, output.duration_seconds).await?;

    Ok(transcript)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
