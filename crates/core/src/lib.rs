//! Pure domain logic for the voice-note transcription service.
//!
//! No I/O lives here: this crate holds the shared id/timestamp types, the
//! domain error enum, the voice-note status state machine, upload metadata
//! validation, and transcript text assembly/rendering.

pub mod error;
pub mod status;
pub mod transcript;
pub mod types;
pub mod upload;
