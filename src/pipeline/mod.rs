//! Pipeline orchestrator module for tube-to-text.
//!
//! Wires the full probe → admit → download → tier → transcribe → cleanup
//! sequence for a single URL.
//!
//! # Architecture
//!
//! ```text
//! TranscriptionRequest { url }
//!        │
//!        ▼
//! PipelineOrchestrator::run()      ← blocking, single-threaded
//!        │
//!        ├─ DurationProbe::probe        [DurationChecked]
//!        ├─ duration ≤ 3600 s?          [Admitted]
//!        ├─ AudioAcquirer::acquire      [Downloaded]   → ScratchAudioFile
//!        ├─ select_tier                 [TierSelected]
//!        └─ SpeechEngine::transcribe    [Transcribing] → [Done]
//!
//! Transcript { text } ──▶ caller (stdout)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tube_to_text::acquire::YtDlpAcquirer;
//! use tube_to_text::config::{AppPaths, PipelineConfig};
//! use tube_to_text::pipeline::{PipelineOrchestrator, TranscriptionRequest};
//! use tube_to_text::probe::YtDlpProbe;
//! use tube_to_text::stt::{ModelPaths, WhisperEngine};
//!
//! let paths = AppPaths::new();
//! let mut orchestrator = PipelineOrchestrator::new(
//!     PipelineConfig::default(),
//!     Arc::new(YtDlpProbe::new()),
//!     Arc::new(YtDlpAcquirer::new(paths.scratch_dir)),
//!     Arc::new(WhisperEngine::new(ModelPaths::new())),
//! );
//!
//! let request = TranscriptionRequest::new("https://example.com/watch?v=abc");
//! let transcript = orchestrator.run(&request).unwrap();
//! println!("{}", transcript.text);
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{PipelineError, PipelineOrchestrator, Transcript, TranscriptionRequest};
pub use state::PipelineState;
