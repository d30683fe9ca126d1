//! Request handlers, grouped by resource.

pub mod auth;
pub mod transcripts;
pub mod voice_notes;
