//! Speech-to-text engine for stored voice notes.
//!
//! Pipeline: audio file -> symphonia decode -> mono downmix -> rubato
//! resample to 16 kHz f32 -> whisper-rs beam-search decode -> ordered
//! timestamped segments plus detected language and duration.
//!
//! The [`SpeechToText`] trait is the seam between the HTTP layer and the
//! model so tests can substitute a scripted engine.

pub mod audio;
pub mod engine;

use std::path::Path;

pub use engine::WhisperEngine;

/// Errors produced while loading the model or transcribing a file.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to load whisper model: {0}")]
    ModelLoad(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Transcription failed: {0}")]
    Inference(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One timestamped segment, in model-produced order. Times are seconds from
/// the start of the recording.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscribedSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

/// The full result of transcribing one file.
#[derive(Debug, Clone)]
pub struct TranscriptionOutput {
    /// Segments in the order the model produced them.
    pub segments: Vec<TranscribedSegment>,
    /// Detected language code (e.g. `"en"`), if the model reported one.
    pub language: Option<String>,
    /// Audio duration in seconds, if known.
    pub duration_seconds: Option<f64>,
}

/// Transcribes a stored audio file into timestamped segments.
#[async_trait::async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionOutput, EngineError>;
}
