//! Pipeline state machine.
//!
//! [`PipelineState`] names the stages a transcription run walks through.
//! The orchestrator tracks it so tests can assert where a run ended, and
//! state transitions show up in the debug log.

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the download-transcode-transcribe pipeline.
///
/// Transitions are strictly forward:
///
/// ```text
/// Start ──probe──▶ DurationChecked ──admission──▶ Admitted
///       ──download──▶ Downloaded ──tier──▶ TierSelected
///       ──consume stream──▶ Transcribing ──▶ Done
/// any non-terminal state ──failure──▶ Error
/// ```
///
/// The scratch-file cleanup runs on entry to `Done` or `Error` — it is
/// carried by the [`ScratchAudioFile`](crate::acquire::ScratchAudioFile)
/// guard rather than an explicit transition action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing has happened yet.
    Start,

    /// The duration probe answered.
    DurationChecked,

    /// The duration is within the admission threshold.
    Admitted,

    /// The audio file exists on disk and is owned by the orchestrator.
    Downloaded,

    /// A model tier has been chosen for the probed duration.
    TierSelected,

    /// The segment stream is being consumed.
    Transcribing,

    /// The transcript was produced; the scratch file is gone.
    Done,

    /// The run failed; the scratch file (if any) is gone.
    Error,
}

impl PipelineState {
    /// A short human-readable label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Start => "start",
            PipelineState::DurationChecked => "duration-checked",
            PipelineState::Admitted => "admitted",
            PipelineState::Downloaded => "downloaded",
            PipelineState::TierSelected => "tier-selected",
            PipelineState::Transcribing => "transcribing",
            PipelineState::Done => "done",
            PipelineState::Error => "error",
        }
    }

    /// Returns `true` for the two states a run can end in.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Error)
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        PipelineState::Start
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_default() {
        assert_eq!(PipelineState::default(), PipelineState::Start);
    }

    #[test]
    fn only_done_and_error_are_terminal() {
        assert!(PipelineState::Done.is_terminal());
        assert!(PipelineState::Error.is_terminal());

        for state in [
            PipelineState::Start,
            PipelineState::DurationChecked,
            PipelineState::Admitted,
            PipelineState::Downloaded,
            PipelineState::TierSelected,
            PipelineState::Transcribing,
        ] {
            assert!(!state.is_terminal(), "{state:?} must not be terminal");
        }
    }

    #[test]
    fn labels_are_distinct() {
        let states = [
            PipelineState::Start,
            PipelineState::DurationChecked,
            PipelineState::Admitted,
            PipelineState::Downloaded,
            PipelineState::TierSelected,
            PipelineState::Transcribing,
            PipelineState::Done,
            PipelineState::Error,
        ];
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a.label(), b.label());
            }
        }
    }
}
