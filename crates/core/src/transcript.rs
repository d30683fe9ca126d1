//! Transcript text assembly and plain-text export rendering.

use crate::types::Timestamp;

/// Width of the `=` separator lines in the download rendering.
const SEPARATOR_WIDTH: usize = 60;

/// Join segment texts into the transcript's full text.
///
/// Each segment is trimmed and the pieces are joined by single spaces, in
/// the order produced by the model. Empty segments are skipped so the result
/// never contains doubled spaces.
pub fn assemble_full_text<'a, I>(segment_texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    segment_texts
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a segment start time in seconds as `[MM:SS]`.
///
/// Minutes and seconds are computed by integer division/modulo and
/// zero-padded to two digits.
pub fn format_timestamp(start_time: f64) -> String {
    let total = start_time as u64;
    format!("[{:02}:{:02}]", total / 60, total % 60)
}

/// A segment as needed by the export renderer.
pub struct ExportSegment<'a> {
    pub start_time: f64,
    pub text: &'a str,
}

/// Everything the export renderer needs about a transcript.
pub struct ExportInput<'a> {
    pub original_filename: &'a str,
    pub language: Option<&'a str>,
    pub model_size: &'a str,
    pub created_at: Timestamp,
    pub segments: Vec<ExportSegment<'a>>,
    pub full_text: &'a str,
}

/// Render the deterministic plain-text download for a transcript.
///
/// Layout: header block (filename, language, model, date), separator, one
/// `[MM:SS] text` line per segment, separator, then the full concatenated
/// text.
pub fn render_download_text(input: &ExportInput<'_>) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);

    let mut lines = Vec::new();
    lines.push(format!("Transcript: {}", input.original_filename));
    lines.push(format!(
        "Language: {}",
        input.language.unwrap_or("unknown")
    ));
    lines.push(format!("Model: {}", input.model_size));
    lines.push(format!("Date: {}", input.created_at));
    lines.push(String::new());
    lines.push(separator.clone());
    lines.push(String::new());

    for seg in &input.segments {
        lines.push(format!("{} {}", format_timestamp(seg.start_time), seg.text));
    }

    lines.push(String::new());
    lines.push(separator);
    lines.push(String::new());
    lines.push("Full Text:".to_string());
    lines.push(input.full_text.to_string());

    lines.join("\n")
}
