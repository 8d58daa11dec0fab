//! Pipeline orchestrator — drives one URL through probe, admission,
//! download, tier selection and transcription.
//!
//! # Pipeline flow
//!
//! ```text
//! TranscriptionRequest { url }
//!   ├─▶ DurationProbe::probe            [DurationChecked]
//!   ├─▶ duration ≤ max?                 [Admitted]   (else DurationExceeded)
//!   ├─▶ AudioAcquirer::acquire          [Downloaded] → ScratchAudioFile guard
//!   ├─▶ select_tier(cached duration)    [TierSelected]
//!   └─▶ SpeechEngine::transcribe        [Transcribing]
//!         └─▶ join segments, trim       [Done]
//! any failure ──▶ [Error]
//! ```
//!
//! The run is strictly sequential and blocking; each stage completes before
//! the next begins.  The scratch file is exclusively owned by the guard for
//! the whole run and removed on every exit path, including early `?`
//! returns — a failed deletion is logged as a warning and never changes the
//! run's outcome.

use std::sync::Arc;

use thiserror::Error;

use crate::acquire::{AudioAcquirer, DownloadError, ScratchAudioFile};
use crate::config::PipelineConfig;
use crate::probe::{DurationProbe, ProbeError};
use crate::stt::{select_tier, SpeechEngine, TranscriptionError};

use super::state::PipelineState;

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// Immutable input of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    /// The remote video URL to transcribe.
    pub url: String,
}

impl TranscriptionRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// The final transcript, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    /// Segment texts joined with single spaces, trimmed.
    pub text: String,
}

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Everything that can abort a pipeline run.  Each failure kind is a
/// distinct variant so callers and tests can tell them apart; none is
/// retried.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// The metadata probe failed (network, bad URL, unparsable dump).
    #[error("duration check failed: {0}")]
    Probe(#[from] ProbeError),

    /// The input exceeds the admission threshold.  Durations are reported
    /// in whole minutes (integer truncation).
    #[error("media too long ({observed_mins} mins > {max_mins} mins max)")]
    DurationExceeded { observed_mins: u64, max_mins: u64 },

    /// Acquisition produced no usable file.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The acquirer returned a path that does not exist on disk.
    #[error("audio file not found at {0}")]
    AudioNotFound(String),

    /// The speech engine failed, either at load or mid-stream.
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Sequences probe → admission → download → tier selection → transcription
/// → cleanup, and owns all failure semantics.
///
/// Collaborators are trait objects so tests can run the full state machine
/// with mocks.
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    probe: Arc<dyn DurationProbe>,
    acquirer: Arc<dyn AudioAcquirer>,
    engine: Arc<dyn SpeechEngine>,
    state: PipelineState,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator in the `Start` state.
    pub fn new(
        config: PipelineConfig,
        probe: Arc<dyn DurationProbe>,
        acquirer: Arc<dyn AudioAcquirer>,
        engine: Arc<dyn SpeechEngine>,
    ) -> Self {
        Self {
            config,
            probe,
            acquirer,
            engine,
            state: PipelineState::Start,
        }
    }

    /// The state the most recent run ended in (or `Start` before any run).
    pub fn state(&self) -> PipelineState {
        self.state
    }

    // -----------------------------------------------------------------------
    // Entry point
    // -----------------------------------------------------------------------

    /// Run the full pipeline for one request.
    ///
    /// On return — `Ok` or `Err` — the temporary audio file no longer
    /// exists on disk and the orchestrator is in a terminal state.
    pub fn run(&mut self, request: &TranscriptionRequest) -> Result<Transcript, PipelineError> {
        log::info!("starting transcription for {}", request.url);
        self.state = PipelineState::Start;

        let result = self.run_stages(request);

        match &result {
            Ok(_) => self.set_state(PipelineState::Done),
            Err(e) => {
                log::error!("transcription failed: {e}");
                self.set_state(PipelineState::Error);
            }
        }

        result
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    fn run_stages(&mut self, request: &TranscriptionRequest) -> Result<Transcript, PipelineError> {
        // ── 1. Duration probe ────────────────────────────────────────────
        // Probed once and cached for the whole run; admission and tier
        // selection both read this value.
        let duration_secs = self.probe.probe(&request.url)?;
        self.set_state(PipelineState::DurationChecked);

        // ── 2. Admission check ───────────────────────────────────────────
        if duration_secs > self.config.max_duration_secs {
            return Err(PipelineError::DurationExceeded {
                observed_mins: duration_secs / 60,
                max_mins: self.config.max_duration_secs / 60,
            });
        }
        self.set_state(PipelineState::Admitted);

        // ── 3. Acquire audio ─────────────────────────────────────────────
        // The guard owns the file from here on; its Drop removes it on
        // every exit path below, including the `?` returns.
        let audio = ScratchAudioFile::new(self.acquirer.acquire(&request.url)?);
        self.set_state(PipelineState::Downloaded);

        if !audio.path().exists() {
            return Err(PipelineError::AudioNotFound(
                audio.path().display().to_string(),
            ));
        }

        // ── 4. Tier selection ────────────────────────────────────────────
        let tier = select_tier(duration_secs, &self.config);
        log::info!(
            "using model: {} (duration: {}m)",
            tier.capacity.label(),
            duration_secs / 60
        );
        self.set_state(PipelineState::TierSelected);

        // ── 5. Transcribe ────────────────────────────────────────────────
        self.set_state(PipelineState::Transcribing);
        let stream = self.engine.transcribe(audio.path(), tier)?;

        let mut chunks: Vec<String> = Vec::new();
        for (i, segment) in stream.enumerate() {
            chunks.push(segment?.text);
            if i % self.config.progress_interval == 0 {
                log::info!("transcribed {i} segments...");
            }
        }

        let text = chunks.join(" ").trim().to_string();
        log::info!(
            "transcription complete ({} words)",
            text.split_whitespace().count()
        );

        Ok(Transcript { text })
        // `audio` drops here (and on every error path) → scratch cleanup.
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn set_state(&mut self, next: PipelineState) {
        log::debug!("pipeline: {} → {}", self.state.label(), next.label());
        self.state = next;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::MockAudioAcquirer;
    use crate::probe::MockDurationProbe;
    use crate::stt::MockSpeechEngine;

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn orchestrator(
        probe: MockDurationProbe,
        acquirer: Arc<MockAudioAcquirer>,
        engine: MockSpeechEngine,
    ) -> PipelineOrchestrator {
        PipelineOrchestrator::new(
            PipelineConfig::default(),
            Arc::new(probe),
            acquirer,
            Arc::new(engine),
        )
    }

    fn request() -> TranscriptionRequest {
        TranscriptionRequest::new("https://example.com/watch?v=abc123")
    }

    // -----------------------------------------------------------------------
    // End-to-end scenarios
    // -----------------------------------------------------------------------

    /// Scenario 1: 120 s clip with three segments produces the space-joined
    /// transcript and leaves no file behind.
    #[test]
    fn short_clip_produces_joined_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp3");

        let acquirer = Arc::new(MockAudioAcquirer::producing(&path));
        let mut orc = orchestrator(
            MockDurationProbe::seconds(120),
            Arc::clone(&acquirer),
            MockSpeechEngine::segments(&["hello", "world", "today"]),
        );

        let transcript = orc.run(&request()).unwrap();

        assert_eq!(transcript.text, "hello world today");
        assert_eq!(orc.state(), PipelineState::Done);
        assert!(!path.exists(), "scratch file must be removed after success");
    }

    /// Scenario 2: a 4000 s input aborts before any download attempt with a
    /// whole-minute message (66 > 60).
    #[test]
    fn over_long_input_aborts_before_download() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp3");

        let acquirer = Arc::new(MockAudioAcquirer::producing(&path));
        let mut orc = orchestrator(
            MockDurationProbe::seconds(4_000),
            Arc::clone(&acquirer),
            MockSpeechEngine::segments(&["unreached"]),
        );

        let err = orc.run(&request()).unwrap_err();

        assert!(matches!(err, PipelineError::DurationExceeded { .. }));
        let msg = err.to_string();
        assert!(msg.contains("66"), "message must report observed minutes: {msg}");
        assert!(msg.contains("60"), "message must report maximum minutes: {msg}");

        assert_eq!(acquirer.calls(), 0, "no download may be attempted");
        assert!(!path.exists(), "no file may ever be created");
        assert_eq!(orc.state(), PipelineState::Error);
    }

    /// Scenario 3: acquisition finds no output file — the error propagates
    /// and no cleanup is needed.
    #[test]
    fn failed_download_propagates_no_output() {
        let acquirer = Arc::new(MockAudioAcquirer::failing(DownloadError::NoOutput));
        let mut orc = orchestrator(
            MockDurationProbe::seconds(120),
            Arc::clone(&acquirer),
            MockSpeechEngine::segments(&["unreached"]),
        );

        let err = orc.run(&request()).unwrap_err();

        assert!(matches!(err, PipelineError::Download(DownloadError::NoOutput)));
        assert_eq!(orc.state(), PipelineState::Error);
    }

    // -----------------------------------------------------------------------
    // Failure semantics
    // -----------------------------------------------------------------------

    /// A probe failure aborts immediately; nothing was downloaded.
    #[test]
    fn probe_failure_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp3");

        let acquirer = Arc::new(MockAudioAcquirer::producing(&path));
        let mut orc = orchestrator(
            MockDurationProbe::err(ProbeError::Engine("dns failure".into())),
            Arc::clone(&acquirer),
            MockSpeechEngine::segments(&["unreached"]),
        );

        let err = orc.run(&request()).unwrap_err();

        assert!(matches!(err, PipelineError::Probe(_)));
        assert_eq!(acquirer.calls(), 0);
        assert_eq!(orc.state(), PipelineState::Error);
    }

    /// An acquirer that reports success but leaves no file behind is
    /// distinguishable from a download failure.
    #[test]
    fn missing_acquired_file_is_audio_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-created.mp3");

        let acquirer = Arc::new(MockAudioAcquirer::missing(&path));
        let mut orc = orchestrator(
            MockDurationProbe::seconds(120),
            Arc::clone(&acquirer),
            MockSpeechEngine::segments(&["unreached"]),
        );

        let err = orc.run(&request()).unwrap_err();

        assert!(matches!(err, PipelineError::AudioNotFound(_)));
        assert_eq!(orc.state(), PipelineState::Error);
    }

    /// A mid-stream engine failure propagates AND the scratch file is still
    /// removed — the central resource invariant.
    #[test]
    fn mid_stream_failure_still_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp3");

        let acquirer = Arc::new(MockAudioAcquirer::producing(&path));
        let mut orc = orchestrator(
            MockDurationProbe::seconds(120),
            Arc::clone(&acquirer),
            MockSpeechEngine::failing_after(
                &["partial"],
                TranscriptionError::Inference("decoder blew up".into()),
            ),
        );

        let err = orc.run(&request()).unwrap_err();

        assert!(matches!(err, PipelineError::Transcription(_)));
        assert!(!path.exists(), "scratch file must be removed after failure");
        assert_eq!(orc.state(), PipelineState::Error);
    }

    /// An engine that fails at load (e.g. missing model) also cleans up.
    #[test]
    fn engine_load_failure_still_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp3");

        let acquirer = Arc::new(MockAudioAcquirer::producing(&path));
        let mut orc = orchestrator(
            MockDurationProbe::seconds(120),
            Arc::clone(&acquirer),
            MockSpeechEngine::load_err(TranscriptionError::ModelNotFound("gone".into())),
        );

        assert!(orc.run(&request()).is_err());
        assert!(!path.exists());
        assert_eq!(orc.state(), PipelineState::Error);
    }

    // -----------------------------------------------------------------------
    // Edge cases
    // -----------------------------------------------------------------------

    /// Unknown duration (0) is admitted, not rejected.
    #[test]
    fn unknown_duration_is_admitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp3");

        let acquirer = Arc::new(MockAudioAcquirer::producing(&path));
        let mut orc = orchestrator(
            MockDurationProbe::seconds(0),
            Arc::clone(&acquirer),
            MockSpeechEngine::segments(&["ok"]),
        );

        assert_eq!(orc.run(&request()).unwrap().text, "ok");
        assert_eq!(orc.state(), PipelineState::Done);
    }

    /// Exactly the maximum duration is still admitted; the threshold is
    /// strictly greater-than.
    #[test]
    fn exactly_max_duration_is_admitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp3");

        let acquirer = Arc::new(MockAudioAcquirer::producing(&path));
        let mut orc = orchestrator(
            MockDurationProbe::seconds(3_600),
            Arc::clone(&acquirer),
            MockSpeechEngine::segments(&["ok"]),
        );

        assert!(orc.run(&request()).is_ok());
    }

    /// An empty segment stream yields an empty transcript, not an error.
    #[test]
    fn empty_stream_yields_empty_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp3");

        let acquirer = Arc::new(MockAudioAcquirer::producing(&path));
        let mut orc = orchestrator(
            MockDurationProbe::seconds(120),
            Arc::clone(&acquirer),
            MockSpeechEngine::segments(&[]),
        );

        assert_eq!(orc.run(&request()).unwrap().text, "");
        assert_eq!(orc.state(), PipelineState::Done);
    }

    /// Segment order must be preserved across a long stream (more than one
    /// progress interval).
    #[test]
    fn long_stream_preserves_segment_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp3");

        let texts: Vec<String> = (0..120).map(|i| format!("w{i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

        let acquirer = Arc::new(MockAudioAcquirer::producing(&path));
        let mut orc = orchestrator(
            MockDurationProbe::seconds(120),
            Arc::clone(&acquirer),
            MockSpeechEngine::segments(&refs),
        );

        let transcript = orc.run(&request()).unwrap();
        assert_eq!(transcript.text, texts.join(" "));
    }
}
