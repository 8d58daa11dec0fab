//! Core transcription engine trait and the whisper-rs implementation.
//!
//! # Overview
//!
//! [`SpeechEngine`] is the public interface used by the pipeline.  It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn SpeechEngine>`.
//!
//! [`WhisperEngine`] is the production implementation.  Each call loads the
//! GGML model for the requested [`ModelTier`], decodes the input file to
//! 16 kHz mono PCM, and returns a **lazy, finite, forward-only** stream of
//! [`Segment`]s: audio is inferred one 60-second window at a time, so the
//! caller observes segments (and can log progress) while later windows are
//! still unprocessed.  The stream is single-pass and not restartable.
//!
//! [`MockSpeechEngine`] (available under `#[cfg(test)]`) returns
//! pre-configured segments — useful for unit-testing the pipeline without a
//! GGML model file or ffmpeg.

use std::collections::VecDeque;
use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::stt::decode::{decode_to_pcm, SAMPLE_RATE};
use crate::stt::model::ModelPaths;
use crate::stt::tier::ModelTier;

// ---------------------------------------------------------------------------
// TranscriptionError
// ---------------------------------------------------------------------------

/// All errors that can arise from the transcription subsystem.
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    /// The GGML model file for the selected tier was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// `whisper_rs` failed to initialise a `WhisperContext` or
    /// `WhisperState`.
    #[error("whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// The input file could not be decoded to PCM.
    #[error("audio decode failed: {0}")]
    Decode(String),

    /// An error occurred during an inference pass.
    #[error("transcription error: {0}")]
    Inference(String),
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One timed span of recognized speech text.
///
/// `order` increases strictly across a stream; it is the sole ordering
/// guarantee the engine provides — no reordering, deduplication, or merging
/// happens downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Position of this segment in the stream, starting at 0.
    pub order: usize,
    /// Recognized text (may include punctuation inserted by Whisper).
    pub text: String,
    /// Start time in milliseconds from the beginning of the audio.
    pub start_ms: u64,
    /// End time in milliseconds from the beginning of the audio.
    pub end_ms: u64,
}

/// A lazy, finite, forward-only sequence of segments.
pub type SegmentStream = Box<dyn Iterator<Item = Result<Segment, TranscriptionError>> + Send>;

// ---------------------------------------------------------------------------
// SpeechEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech-recognition engines.
///
/// # Contract
///
/// - `audio` is a path to a decodable audio file on disk.
/// - The returned stream yields segments in strictly increasing `order`.
/// - The stream is single-pass; a new call starts a new transcription.
pub trait SpeechEngine: Send + Sync {
    /// Transcribe the file at `audio` with the model selected by `tier`.
    fn transcribe(&self, audio: &Path, tier: ModelTier) -> Result<SegmentStream, TranscriptionError>;
}

// Compile-time assertion: Box<dyn SpeechEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechEngine>) {}
};

// ---------------------------------------------------------------------------
// Window constants (16 kHz mono f32)
// ---------------------------------------------------------------------------

/// Inference window: 60 s × 16 000 Hz = 960 000 samples.
const WINDOW_SAMPLES: usize = 960_000;
/// Windows shorter than 0.5 s (8 000 samples) are skipped — whisper rejects
/// near-empty input and such a remainder carries no usable speech.
const MIN_WINDOW_SAMPLES: usize = 8_000;

/// Returns the number of CPU threads to use for inference, capped at 8 to
/// avoid diminishing returns on Whisper.
pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

/// Production engine that wraps `whisper_rs`.
///
/// The model is loaded per [`transcribe`](SpeechEngine::transcribe) call —
/// the tier (and therefore the file) is not known until then, and one
/// pipeline run performs exactly one transcription.
#[derive(Debug, Clone)]
pub struct WhisperEngine {
    paths: ModelPaths,
    n_threads: i32,
}

impl WhisperEngine {
    /// Create an engine resolving model files via `paths`.
    pub fn new(paths: ModelPaths) -> Self {
        Self {
            paths,
            n_threads: optimal_threads(),
        }
    }
}

impl SpeechEngine for WhisperEngine {
    fn transcribe(&self, audio: &Path, tier: ModelTier) -> Result<SegmentStream, TranscriptionError> {
        // ── Resolve and load the tier's model ─────────────────────────────
        let model_path = self
            .paths
            .for_tier(tier)
            .ok_or_else(|| TranscriptionError::ModelNotFound(format!("{tier:?}")))?;

        if !model_path.exists() {
            return Err(TranscriptionError::ModelNotFound(
                model_path.display().to_string(),
            ));
        }

        let path_str = model_path.to_str().ok_or_else(|| {
            TranscriptionError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                model_path.display()
            ))
        })?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| TranscriptionError::ContextInit(e.to_string()))?;

        log::debug!(
            "engine: loaded {} ({} capacity)",
            model_path.display(),
            tier.capacity.label()
        );

        // ── Decode input to PCM ───────────────────────────────────────────
        let samples = decode_to_pcm(audio)?;
        log::debug!(
            "engine: decoded {} samples ({:.1} s)",
            samples.len(),
            samples.len() as f64 / SAMPLE_RATE as f64
        );

        Ok(Box::new(WindowedSegments {
            ctx,
            samples,
            cursor: 0,
            pending: VecDeque::new(),
            order: 0,
            n_threads: self.n_threads,
        }))
    }
}

// ---------------------------------------------------------------------------
// WindowedSegments
// ---------------------------------------------------------------------------

/// Lazy segment iterator over fixed 60-second inference windows.
///
/// `next()` pops from the current window's segment queue; when the queue is
/// empty the next window is inferred on the spot.  An inference failure ends
/// the stream after yielding the error once.
struct WindowedSegments {
    ctx: WhisperContext,
    samples: Vec<f32>,
    /// Index of the first sample of the next window.
    cursor: usize,
    /// Segments of the current window, not yet handed out.
    pending: VecDeque<Segment>,
    /// Next `Segment::order` to assign.
    order: usize,
    n_threads: i32,
}

// `WhisperContext` holds a raw pointer internally but declares
// `unsafe impl Send` and `unsafe impl Sync` in whisper-rs — the model
// weights are read-only after loading.  All other fields are owned values.
// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs.
unsafe impl Send for WindowedSegments {}

impl WindowedSegments {
    /// Run inference on the next window and queue its segments.
    ///
    /// Returns `Ok(false)` when no window remains.
    fn advance_window(&mut self) -> Result<bool, TranscriptionError> {
        let remaining = self.samples.len() - self.cursor;
        if remaining < MIN_WINDOW_SAMPLES {
            self.cursor = self.samples.len();
            return Ok(false);
        }

        let start = self.cursor;
        let end = (start + WINDOW_SAMPLES).min(self.samples.len());
        self.cursor = end;

        // Window offset in ms: samples / 16 000 Hz × 1 000.
        let offset_ms = (start as u64) / 16;

        // ── Build FullParams ──────────────────────────────────────────────
        let mut fp = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        fp.set_language(None); // auto-detect
        fp.set_n_threads(self.n_threads);
        fp.set_print_progress(false);
        fp.set_print_realtime(false);
        fp.set_print_special(false);
        // Voice-activity filtering: drop tokens that are not speech.
        fp.set_suppress_non_speech_tokens(true);

        // ── Per-window state and inference ────────────────────────────────
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| TranscriptionError::ContextInit(e.to_string()))?;

        state
            .full(fp, &self.samples[start..end])
            .map_err(|e| TranscriptionError::Inference(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| TranscriptionError::Inference(e.to_string()))?;

        for i in 0..n_segments {
            let text = state
                .full_get_segment_text(i)
                .map_err(|e| TranscriptionError::Inference(format!("segment {i}: {e}")))?;

            // Timestamps are in centiseconds → multiply by 10 for ms,
            // then shift by the window offset.
            let t0 = state.full_get_segment_t0(i).unwrap_or(0).max(0) as u64 * 10;
            let t1 = state.full_get_segment_t1(i).unwrap_or(0).max(0) as u64 * 10;

            let text = text.trim().to_string();
            if text.is_empty() {
                continue;
            }

            self.pending.push_back(Segment {
                order: self.order,
                text,
                start_ms: offset_ms + t0,
                end_ms: offset_ms + t1,
            });
            self.order += 1;
        }

        Ok(true)
    }
}

impl Iterator for WindowedSegments {
    type Item = Result<Segment, TranscriptionError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(segment) = self.pending.pop_front() {
                return Some(Ok(segment));
            }
            if self.cursor >= self.samples.len() {
                return None;
            }
            match self.advance_window() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => {
                    // Terminate the stream after reporting the failure.
                    self.cursor = self.samples.len();
                    return Some(Err(e));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MockSpeechEngine  (test-only)
// ---------------------------------------------------------------------------

/// A test double that yields pre-configured segments without loading a
/// model or spawning ffmpeg.
#[cfg(test)]
pub struct MockSpeechEngine {
    segments: Vec<Segment>,
    /// When set, the stream yields this error after the configured
    /// segments.
    trailing_error: Option<TranscriptionError>,
    /// When set, `transcribe` itself fails.
    load_error: Option<TranscriptionError>,
}

#[cfg(test)]
impl MockSpeechEngine {
    /// A mock whose stream yields one segment per text, in order.
    pub fn segments(texts: &[&str]) -> Self {
        let segments = texts
            .iter()
            .enumerate()
            .map(|(order, text)| Segment {
                order,
                text: (*text).to_string(),
                start_ms: order as u64 * 1_000,
                end_ms: order as u64 * 1_000 + 1_000,
            })
            .collect();
        Self {
            segments,
            trailing_error: None,
            load_error: None,
        }
    }

    /// A mock whose stream yields the given texts and then an error.
    pub fn failing_after(texts: &[&str], error: TranscriptionError) -> Self {
        let mut mock = Self::segments(texts);
        mock.trailing_error = Some(error);
        mock
    }

    /// A mock whose `transcribe` call fails outright.
    pub fn load_err(error: TranscriptionError) -> Self {
        Self {
            segments: Vec::new(),
            trailing_error: None,
            load_error: Some(error),
        }
    }
}

#[cfg(test)]
impl SpeechEngine for MockSpeechEngine {
    fn transcribe(
        &self,
        _audio: &Path,
        _tier: ModelTier,
    ) -> Result<SegmentStream, TranscriptionError> {
        if let Some(e) = &self.load_error {
            return Err(e.clone());
        }

        let items: Vec<Result<Segment, TranscriptionError>> = self
            .segments
            .iter()
            .cloned()
            .map(Ok)
            .chain(self.trailing_error.clone().map(Err))
            .collect();

        Ok(Box::new(items.into_iter()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
