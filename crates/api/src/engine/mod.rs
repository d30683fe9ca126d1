//! Transcription orchestration on top of the speech-to-text engine.

pub mod transcription;

pub use transcription::run_transcription;
