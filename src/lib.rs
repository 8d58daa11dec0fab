//! tube-to-text — single-shot URL → transcript pipeline.
//!
//! Given one remote video URL, the crate probes the media duration from
//! metadata, rejects over-long inputs, downloads and extracts the audio
//! track via `yt-dlp` into a uniquely named scratch file, picks a Whisper
//! model tier from the duration, transcribes with `whisper-rs`, and returns
//! the concatenated plain-text transcript.  The scratch file is removed on
//! every exit path.
//!
//! ```text
//! URL ─▶ probe ─▶ admit ─▶ acquire ─▶ tier ─▶ transcribe ─▶ Transcript
//!                  │          │                   │
//!                  │          └── ScratchAudioFile guard (Drop = cleanup)
//!                  └── > 3600 s → DurationExceeded
//! ```
//!
//! See [`pipeline::PipelineOrchestrator`] for the entry point.

pub mod acquire;
pub mod config;
pub mod pipeline;
pub mod probe;
pub mod stt;
