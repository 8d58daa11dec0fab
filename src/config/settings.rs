//! Pipeline configuration structs and production defaults.
//!
//! There is deliberately no configuration file and no environment-variable
//! layer: [`PipelineConfig`] is constructed in code and handed to the
//! orchestrator, so tests can run the full pipeline with scaled-down
//! thresholds.

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Admission and tier-selection thresholds plus progress cadence.
///
/// All durations are whole seconds. `Default` carries the production values:
///
/// | Field                | Default | Meaning                                |
/// |----------------------|---------|----------------------------------------|
/// | `max_duration_secs`  | 3600    | inputs longer than this are rejected   |
/// | `mid_tier_secs`      | 600     | above this → Small model               |
/// | `high_tier_secs`     | 1800    | above this → Medium model              |
/// | `progress_interval`  | 50      | log every Nth transcribed segment      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Maximum admissible media duration in seconds.  Longer inputs are
    /// rejected before any download starts.
    pub max_duration_secs: u64,

    /// Durations strictly above this (and at most `high_tier_secs`) select
    /// the Small model.
    pub mid_tier_secs: u64,

    /// Durations strictly above this select the Medium model.
    pub high_tier_secs: u64,

    /// Emit a progress log line every time the running segment index is a
    /// multiple of this value.
    pub progress_interval: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: 3_600,
            mid_tier_secs: 600,
            high_tier_secs: 1_800,
            progress_interval: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_are_ordered() {
        let cfg = PipelineConfig::default();
        assert!(cfg.mid_tier_secs < cfg.high_tier_secs);
        assert!(cfg.high_tier_secs < cfg.max_duration_secs);
    }

    #[test]
    fn default_progress_interval_is_positive() {
        assert!(PipelineConfig::default().progress_interval > 0);
    }
}
