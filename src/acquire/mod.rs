//! Audio acquisition module.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                AudioAcquirer (trait)                   │
//! │                                                        │
//! │   ┌───────────────┐     unique base name               │
//! │   │ YtDlpAcquirer │──▶  scratch_dir/tube_<uuid>        │
//! │   └──────┬────────┘                                    │
//! │          │ yt-dlp -f bestaudio -x --audio-format mp3   │
//! │          ▼                                             │
//! │   probe candidates: .mp3 .webm .m4a .mp4 .mkv (none)   │
//! │          │                                             │
//! │          ▼                                             │
//! │   ScratchAudioFile — owned by the orchestrator,        │
//! │   deleted on Drop (every exit path)                    │
//! └────────────────────────────────────────────────────────┘
//! ```

pub mod download;
pub mod scratch;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use download::{AudioAcquirer, DownloadError, YtDlpAcquirer, CANDIDATE_EXTENSIONS};
pub use scratch::ScratchAudioFile;

// test-only re-export so the pipeline test module can import the mock
// without `use tube_to_text::acquire::download::MockAudioAcquirer`.
#[cfg(test)]
pub use download::MockAudioAcquirer;
