//! Configuration module for tube-to-text.
//!
//! Provides [`PipelineConfig`] (admission / tier thresholds, progress
//! cadence) and [`AppPaths`] for cross-platform model and scratch
//! directories.  There is no settings file — configuration is an explicit
//! struct passed into the orchestrator.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::PipelineConfig;
