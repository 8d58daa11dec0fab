//! Duration probing module.
//!
//! Answers "how long is the media at this URL?" from metadata alone, so the
//! pipeline can reject over-long inputs before paying for a download.

pub mod metadata;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use metadata::{DurationProbe, ProbeError, YtDlpProbe};

// test-only re-export so the pipeline test module can import the mock
// without `use tube_to_text::probe::metadata::MockDurationProbe`.
#[cfg(test)]
pub use metadata::MockDurationProbe;
