//! Upload metadata validation.
//!
//! Extension checks are strict (explicit allow-list); MIME checks are
//! deliberately relaxed because client-reported content types are unreliable
//! (browsers and mobile apps send generic or video types for audio).

use std::path::Path;

/// File extensions accepted for voice-note uploads.
pub const ALLOWED_EXTENSIONS: &[&str] =
    &[".flac", ".m4a", ".mp3", ".mp4", ".ogg", ".wav", ".webm"];

/// Explicitly allowed MIME types, beyond the blanket `audio/*` acceptance.
/// `video/mp4` covers iPhone voice memos shared via messaging apps.
const ALLOWED_MIME_TYPES: &[&str] = &[
    "audio/flac",
    "audio/mp4",
    "audio/mpeg",
    "audio/ogg",
    "audio/wav",
    "audio/webm",
    "audio/x-flac",
    "audio/x-m4a",
    "audio/x-wav",
    "video/mp4",
];

/// Extract the lowercased extension (including the dot) from a filename.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

/// Validate upload file metadata (extension + MIME type).
///
/// Returns a human-readable rejection reason, or `None` when the upload is
/// acceptable. Must be called before any bytes are written to disk.
pub fn validate_upload_metadata(filename: &str, content_type: Option<&str>) -> Option<String> {
    let ext = file_extension(filename).unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Some(format!(
            "Unsupported file type '{ext}'. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ));
    }

    if let Some(mime) = content_type {
        if !ALLOWED_MIME_TYPES.contains(&mime) && !mime.starts_with("audio/") {
            return Some(format!(
                "Invalid content type '{mime}'. Must be an audio file."
            ));
        }
    }

    None
}
