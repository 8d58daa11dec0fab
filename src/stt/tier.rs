//! Model tier selection — capacity and precision from media duration.
//!
//! Larger Whisper models cost proportionally more compute.  Short clips do
//! not need them; long content needs the accuracy margin enough to justify
//! the cost.  [`select_tier`] is a pure function with no failure mode so the
//! mapping is trivially testable with varied thresholds.

use crate::config::PipelineConfig;

// ---------------------------------------------------------------------------
// ModelCapacity
// ---------------------------------------------------------------------------

/// Capacity tier of a Whisper GGML model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelCapacity {
    /// ~148 MB — fastest, lowest accuracy.  Short clips.
    Base,
    /// ~488 MB — balanced.  Medium-length content.
    Small,
    /// ~1.5 GB — highest accuracy, slowest.  Long content.
    Medium,
}

impl ModelCapacity {
    /// A short label for log lines (matches the upstream model family
    /// naming).
    pub fn label(&self) -> &'static str {
        match self {
            ModelCapacity::Base => "base",
            ModelCapacity::Small => "small",
            ModelCapacity::Medium => "medium",
        }
    }
}

// ---------------------------------------------------------------------------
// Precision
// ---------------------------------------------------------------------------

/// Numeric precision of the model weights, trading accuracy for speed and
/// memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// 8-bit quantized weights (q8_0) — default for all production tiers.
    Int8,
    /// Full 16-bit float weights.
    Float16,
}

// ---------------------------------------------------------------------------
// ModelTier
// ---------------------------------------------------------------------------

/// A named combination of capacity and precision, selected per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelTier {
    pub capacity: ModelCapacity,
    pub precision: Precision,
}

/// Map a media duration to a model tier using the thresholds in `config`.
///
/// ```
/// use tube_to_text::config::PipelineConfig;
/// use tube_to_text::stt::{select_tier, ModelCapacity};
///
/// let cfg = PipelineConfig::default();
/// assert_eq!(select_tier(600, &cfg).capacity, ModelCapacity::Base);
/// assert_eq!(select_tier(601, &cfg).capacity, ModelCapacity::Small);
/// assert_eq!(select_tier(1800, &cfg).capacity, ModelCapacity::Small);
/// assert_eq!(select_tier(1801, &cfg).capacity, ModelCapacity::Medium);
/// ```
pub fn select_tier(duration_secs: u64, config: &PipelineConfig) -> ModelTier {
    let capacity = if duration_secs > config.high_tier_secs {
        ModelCapacity::Medium
    } else if duration_secs > config.mid_tier_secs {
        ModelCapacity::Small
    } else {
        ModelCapacity::Base
    };

    ModelTier {
        capacity,
        precision: Precision::Int8,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
