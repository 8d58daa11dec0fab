//! STT (speech-to-text) module.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  SpeechEngine (trait)                    │
//! │                                                          │
//! │  duration ──▶ select_tier ──▶ ModelTier                  │
//! │                                  │                       │
//! │   ┌────────────┐     ┌───────────▼──────┐                │
//! │   │ ModelPaths │────▶│  WhisperEngine   │                │
//! │   │ tier→file  │     │  load model/call │                │
//! │   └────────────┘     └───────┬──────────┘                │
//! │                              │ ffmpeg → 16 kHz f32 PCM   │
//! │                              ▼                           │
//! │                  ┌────────────────────────┐              │
//! │                  │ SegmentStream (lazy)   │              │
//! │                  │ 60 s windows, ordered  │              │
//! │                  └────────────────────────┘              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use tube_to_text::config::PipelineConfig;
//! use tube_to_text::stt::{select_tier, ModelPaths, SpeechEngine, WhisperEngine};
//!
//! let engine = WhisperEngine::new(ModelPaths::new());
//! let tier = select_tier(120, &PipelineConfig::default());
//!
//! let stream = engine.transcribe(Path::new("/tmp/audio.mp3"), tier).unwrap();
//! for segment in stream {
//!     println!("{}", segment.unwrap().text);
//! }
//! ```

pub mod decode;
pub mod engine;
pub mod model;
pub mod tier;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{Segment, SegmentStream, SpeechEngine, TranscriptionError, WhisperEngine};
pub use model::{model_for_tier, ModelInfo, ModelPaths, WHISPER_MODELS};
pub use tier::{select_tier, ModelCapacity, ModelTier, Precision};

// test-only re-export so the pipeline test module can import the mock
// without `use tube_to_text::stt::engine::MockSpeechEngine`.
#[cfg(test)]
pub use engine::MockSpeechEngine;
