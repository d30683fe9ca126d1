//! Decode any supported audio container to the 16 kHz mono f32 PCM whisper
//! expects.

use std::fs::File;
use std::path::Path;

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::EngineError;

/// Sample rate whisper models are trained on.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// PCM ready to feed into the model.
#[derive(Debug)]
pub struct DecodedAudio {
    /// Mono samples at [`WHISPER_SAMPLE_RATE`].
    pub samples: Vec<f32>,
    /// Duration of the original recording in seconds.
    pub duration_seconds: f64,
}

/// Decode `path` and convert it to 16 kHz mono f32.
pub fn decode_to_whisper_pcm(path: &Path) -> Result<DecodedAudio, EngineError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| EngineError::Decode(format!("unrecognized audio format: {e}")))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| EngineError::Decode("no decodable audio track".to_string()))?;
    let track_id = track.id;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| EngineError::Decode("missing sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| EngineError::Decode(format!("unsupported codec: {e}")))?;

    let mut interleaved: Vec<f32> = Vec::new();
    let mut channels: usize = 0;
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream.
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(e) => return Err(EngineError::Decode(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Recoverable corruption: skip the packet.
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(EngineError::Decode(e.to_string())),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            channels = spec.channels.count();
            sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        let buf = sample_buf.as_mut().unwrap();
        buf.copy_interleaved_ref(decoded);
        interleaved.extend_from_slice(buf.samples());
    }

    if interleaved.is_empty() || channels == 0 {
        return Err(EngineError::Decode("audio stream contains no samples".to_string()));
    }

    let mono = downmix_to_mono(&interleaved, channels);
    let duration_seconds = mono.len() as f64 / sample_rate as f64;

    let samples = if sample_rate == WHISPER_SAMPLE_RATE {
        mono
    } else {
        resample(&mono, sample_rate, WHISPER_SAMPLE_RATE)?
    };

    tracing::debug!(
        path = %path.display(),
        duration_seconds,
        source_rate = sample_rate,
        channels,
        "Decoded audio for transcription"
    );

    Ok(DecodedAudio {
        samples,
        duration_seconds,
    })
}

/// Average interleaved channels down to mono.
fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Sinc resample a mono signal from `from_rate` to `to_rate` in one pass.
fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, EngineError> {
    let ratio = to_rate as f64 / from_rate as f64;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, input.len(), 1)
        .map_err(|e| EngineError::Decode(format!("resampler construction failed: {e}")))?;

    let waves_out = resampler
        .process(&[input.to_vec()], None)
        .map_err(|e| EngineError::Decode(format!("resampling failed: {e}")))?;

    Ok(waves_out.into_iter().next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_averages_frames() {
        let stereo = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        let mono = downmix_to_mono(&stereo, 2);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        let mono = [0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&mono, 1), mono.to_vec());
    }

    #[test]
    fn test_resample_halves_sample_count_when_downsampling() {
        let input: Vec<f32> = (0..32_000).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample(&input, 32_000, 16_000).unwrap();
        // One second in, roughly one second out at half the rate.
        let expected = input.len() / 2;
        assert!((output.len() as i64 - expected as i64).unsigned_abs() < 1_000);
    }

    #[test]
    fn test_decode_rejects_non_audio_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .unwrap();
        std::io::Write::write_all(&mut file, b"definitely not audio").unwrap();

        let result = decode_to_whisper_pcm(file.path());
        assert_matches::assert_matches!(result, Err(EngineError::Decode(_)));
    }
}
