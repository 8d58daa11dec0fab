//! Model registry, metadata and path resolution.
//!
//! [`WHISPER_MODELS`] lists the GGML files each [`ModelTier`] maps to.
//! [`ModelPaths`] resolves the on-disk location of a model given an
//! [`crate::config::AppPaths`] instance.

use std::path::PathBuf;

use crate::config::AppPaths;
use crate::stt::tier::{ModelCapacity, ModelTier, Precision};

// ---------------------------------------------------------------------------
// ModelInfo
// ---------------------------------------------------------------------------

/// Static metadata for a single GGML model file.
#[derive(Debug)]
pub struct ModelInfo {
    /// Capacity tier this file serves.
    pub capacity: ModelCapacity,
    /// Weight precision of this file.
    pub precision: Precision,
    /// File name under the models directory.
    pub file_name: &'static str,
    /// Approximate file size in megabytes.
    pub file_size_mb: u64,
    /// Source URL for downloading the GGML file.
    pub source_url: &'static str,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Standard multilingual Whisper models in the precision variants the tier
/// selector can produce.
pub const WHISPER_MODELS: &[ModelInfo] = &[
    ModelInfo {
        capacity: ModelCapacity::Base,
        precision: Precision::Int8,
        file_name: "ggml-base-q8_0.bin",
        file_size_mb: 82,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
    ModelInfo {
        capacity: ModelCapacity::Small,
        precision: Precision::Int8,
        file_name: "ggml-small-q8_0.bin",
        file_size_mb: 264,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
    ModelInfo {
        capacity: ModelCapacity::Medium,
        precision: Precision::Int8,
        file_name: "ggml-medium-q8_0.bin",
        file_size_mb: 823,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
    ModelInfo {
        capacity: ModelCapacity::Base,
        precision: Precision::Float16,
        file_name: "ggml-base.bin",
        file_size_mb: 148,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
    ModelInfo {
        capacity: ModelCapacity::Small,
        precision: Precision::Float16,
        file_name: "ggml-small.bin",
        file_size_mb: 488,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
    ModelInfo {
        capacity: ModelCapacity::Medium,
        precision: Precision::Float16,
        file_name: "ggml-medium.bin",
        file_size_mb: 1_530,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
];

/// Look up the registry entry for a tier.
///
/// Every `(capacity, precision)` combination the tier selector can produce
/// is present in [`WHISPER_MODELS`], so this only returns `None` for
/// hand-built tiers outside the registry.
pub fn model_for_tier(tier: ModelTier) -> Option<&'static ModelInfo> {
    WHISPER_MODELS
        .iter()
        .find(|m| m.capacity == tier.capacity && m.precision == tier.precision)
}

// ---------------------------------------------------------------------------
// ModelPaths
// ---------------------------------------------------------------------------

/// Resolves GGML file locations under the models directory.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    models_dir: PathBuf,
}

impl ModelPaths {
    /// Resolve against the standard application data directory.
    pub fn new() -> Self {
        Self {
            models_dir: AppPaths::new().models_dir,
        }
    }

    /// Resolve against an explicit directory (used by tests).
    pub fn in_dir(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// Full path of the GGML file serving `tier`.
    pub fn for_tier(&self, tier: ModelTier) -> Option<PathBuf> {
        model_for_tier(tier).map(|m| self.models_dir.join(m.file_name))
    }
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
