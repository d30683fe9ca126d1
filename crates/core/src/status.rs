//! Voice-note status state machine.
//!
//! A note moves `uploaded -> transcribing -> completed`. Transcription may
//! only be triggered from `uploaded` or `failed`; a note that is already
//! `transcribing` or `completed` must be rejected with a status-conflict
//! error by the caller.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of a voice note, stored as TEXT in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceNoteStatus {
    Uploaded,
    Transcribing,
    Completed,
    Failed,
}

impl VoiceNoteStatus {
    /// Parse from the database `status` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "uploaded" => Ok(Self::Uploaded),
            "transcribing" => Ok(Self::Transcribing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::Internal(format!(
                "Unknown voice note status '{other}'"
            ))),
        }
    }

    /// Database name value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Transcribing => "transcribing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether a transcribe request is allowed from this state.
    ///
    /// Only `uploaded` and `failed` notes may enter `transcribing`.
    pub fn can_transcribe(self) -> bool {
        matches!(self, Self::Uploaded | Self::Failed)
    }
}

impl std::fmt::Display for VoiceNoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_name() {
        for status in [
            VoiceNoteStatus::Uploaded,
            VoiceNoteStatus::Transcribing,
            VoiceNoteStatus::Completed,
            VoiceNoteStatus::Failed,
        ] {
            assert_eq!(VoiceNoteStatus::from_name(status.name()).unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_name_is_internal_error() {
        let result = VoiceNoteStatus::from_name("exploded");
        assert!(result.is_err());
    }

    #[test]
    fn test_transcribe_allowed_from_uploaded_and_failed_only() {
        assert!(VoiceNoteStatus::Uploaded.can_transcribe());
        assert!(VoiceNoteStatus::Failed.can_transcribe());
        assert!(!VoiceNoteStatus::Transcribing.can_transcribe());
        assert!(!VoiceNoteStatus::Completed.can_transcribe());
    }
}
