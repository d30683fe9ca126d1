//! whisper.cpp-backed [`SpeechToText`] implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::decode_to_whisper_pcm;
use crate::{EngineError, SpeechToText, TranscribedSegment, TranscriptionOutput};

/// Beam width used for decoding.
const BEAM_SIZE: i32 = 5;

/// Lazily-initialized whisper engine.
///
/// Loading a ggml model takes seconds and hundreds of megabytes, so the
/// context is created at most once per process, behind a [`OnceCell`] so
/// concurrent first requests race safely, and shared afterwards. Inference
/// itself creates a fresh whisper state per call and runs on the blocking
/// thread pool.
pub struct WhisperEngine {
    model_path: PathBuf,
    context: OnceCell<Arc<WhisperContext>>,
}

impl WhisperEngine {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            context: OnceCell::new(),
        }
    }

    /// Get the shared model context, loading it on first use.
    async fn context(&self) -> Result<Arc<WhisperContext>, EngineError> {
        self.context
            .get_or_try_init(|| async {
                let path = self.model_path.clone();
                tokio::task::spawn_blocking(move || load_context(&path))
                    .await
                    .map_err(|e| EngineError::ModelLoad(format!("load task panicked: {e}")))?
            })
            .await
            .cloned()
    }
}

#[async_trait::async_trait]
impl SpeechToText for WhisperEngine {
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionOutput, EngineError> {
        let context = self.context().await?;
        let path = audio_path.to_path_buf();

        tokio::task::spawn_blocking(move || run_inference(&context, &path))
            .await
            .map_err(|e| EngineError::Inference(format!("transcription task panicked: {e}")))?
    }
}

/// Load the ggml model from disk.
fn load_context(model_path: &Path) -> Result<Arc<WhisperContext>, EngineError> {
    if !model_path.exists() {
        return Err(EngineError::ModelLoad(format!(
            "model file not found at {}",
            model_path.display()
        )));
    }

    tracing::info!(model = %model_path.display(), "Loading whisper model");
    let path = model_path
        .to_str()
        .ok_or_else(|| EngineError::ModelLoad("model path is not valid UTF-8".to_string()))?;

    WhisperContext::new_with_params(path, WhisperContextParameters::default())
        .map(Arc::new)
        .map_err(|e| EngineError::ModelLoad(e.to_string()))
}

/// Decode the file and run a full beam-search pass, collecting ordered
/// timestamped segments.
fn run_inference(
    context: &WhisperContext,
    audio_path: &Path,
) -> Result<TranscriptionOutput, EngineError> {
    let decoded = decode_to_whisper_pcm(audio_path)?;

    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: BEAM_SIZE,
        patience: 1.0,
    });
    // None selects whisper's built-in language auto-detection.
    params.set_language(None);
    params.set_translate(false);
    params.set_print_special(false);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);
    params.set_suppress_blank(true);

    let mut state = context
        .create_state()
        .map_err(|e| EngineError::Inference(e.to_string()))?;
    state
        .full(params, &decoded.samples)
        .map_err(|e| EngineError::Inference(e.to_string()))?;

    let num_segments = state
        .full_n_segments()
        .map_err(|e| EngineError::Inference(e.to_string()))?;

    let mut segments = Vec::with_capacity(num_segments as usize);
    for i in 0..num_segments {
        let text = match state.full_get_segment_text_lossy(i) {
            Ok(text) => text,
            Err(_) => continue,
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Segment timestamps are reported in centiseconds.
        let t0 = state.full_get_segment_t0(i).unwrap_or(0);
        let t1 = state.full_get_segment_t1(i).unwrap_or(t0);
        segments.push(TranscribedSegment {
            start_time: t0 as f64 / 100.0,
            end_time: t1 as f64 / 100.0,
            text: trimmed.to_string(),
        });
    }

    let language = state
        .full_lang_id_from_state()
        .ok()
        .and_then(whisper_rs::get_lang_str)
        .map(str::to_string);

    tracing::info!(
        path = %audio_path.display(),
        segments = segments.len(),
        language = language.as_deref().unwrap_or("unknown"),
        duration_seconds = decoded.duration_seconds,
        "Transcription finished"
    );

    Ok(TranscriptionOutput {
        segments,
        language,
        duration_seconds: Some(decoded.duration_seconds),
    })
}
