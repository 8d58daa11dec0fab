//! Audio decoding — container file → 16 kHz mono f32 PCM via ffmpeg.
//!
//! Whisper consumes raw 16 kHz mono f32 samples, but the acquirer hands us
//! whatever container yt-dlp produced (mp3, webm, m4a, …).  Rather than
//! linking a demuxer per format, decoding is delegated to an `ffmpeg`
//! subprocess writing raw `f32le` to stdout.

use std::path::Path;
use std::process::Command;

use crate::stt::engine::TranscriptionError;

/// Sample rate Whisper expects.
pub const SAMPLE_RATE: u32 = 16_000;

/// Decode the audio file at `path` to 16 kHz mono f32 PCM.
///
/// # Errors
///
/// [`TranscriptionError::Decode`] when ffmpeg cannot be spawned or rejects
/// the input.
pub(crate) fn decode_to_pcm(path: &Path) -> Result<Vec<f32>, TranscriptionError> {
    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error"])
        .arg("-i")
        .arg(path)
        .args(["-f", "f32le", "-ac", "1", "-ar", "16000", "pipe:1"])
        .output()
        .map_err(|e| {
            TranscriptionError::Decode(format!(
                "failed to run ffmpeg — is it installed? ({e})"
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TranscriptionError::Decode(stderr.trim().to_string()));
    }

    Ok(samples_from_f32le(&output.stdout))
}

/// Reinterpret little-endian f32 bytes as samples.  A trailing partial
/// sample (stream truncation) is dropped.
pub(crate) fn samples_from_f32le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bytes_decode_to_no_samples() {
        assert!(samples_from_f32le(&[]).is_empty());
    }

    #[test]
    fn bytes_round_trip_to_samples() {
        let samples = [0.0f32, 0.5, -1.0];
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        assert_eq!(samples_from_f32le(&bytes), samples);
    }

    #[test]
    fn trailing_partial_sample_is_dropped() {
        let mut bytes: Vec<u8> = 1.0f32.to_le_bytes().to_vec();
        bytes.push(0xAB); // one stray byte
        assert_eq!(samples_from_f32le(&bytes), vec![1.0]);
    }
}
