//! Duration probing via the external download engine's metadata dump.
//!
//! [`DurationProbe`] is the public interface used by the pipeline.  It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn DurationProbe>`.
//!
//! [`YtDlpProbe`] is the production implementation.  It asks `yt-dlp` for the
//! source's metadata as a single JSON document *without downloading any
//! payload* — admission checks must stay cheap even for hour-long inputs.
//!
//! Some sources legitimately omit the duration field (live streams, some
//! extractors).  That is treated as `0` (unknown), never as an error.

use std::process::Command;

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ProbeError
// ---------------------------------------------------------------------------

/// All errors that can arise while fetching media metadata.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// The `yt-dlp` binary could not be spawned at all.
    #[error("failed to run yt-dlp — is it installed? ({0})")]
    Spawn(String),

    /// `yt-dlp` ran but exited non-zero (bad URL, network failure, …).
    #[error("metadata fetch failed: {0}")]
    Engine(String),

    /// The metadata dump was not valid JSON.
    #[error("metadata parse failed: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// DurationProbe trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for duration probing.
///
/// # Contract
///
/// - Must not download media payload — metadata only.
/// - A source with no duration field reports `Ok(0)` (unknown), not an
///   error.
pub trait DurationProbe: Send + Sync {
    /// Return the media duration at `url` in whole seconds.
    fn probe(&self, url: &str) -> Result<u64, ProbeError>;
}

// Compile-time assertion: Box<dyn DurationProbe> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn DurationProbe>) {}
};

// ---------------------------------------------------------------------------
// Metadata document
// ---------------------------------------------------------------------------

/// The subset of yt-dlp's `--dump-single-json` output we care about.
///
/// yt-dlp reports duration as a float for some extractors; it is truncated
/// to whole seconds.
#[derive(Debug, Deserialize)]
struct MediaMetadata {
    #[serde(default)]
    duration: Option<f64>,
}

/// Parse a metadata JSON document into a duration in whole seconds.
///
/// Missing or `null` duration is `0`; negative values (never produced by
/// yt-dlp in practice) clamp to `0`.
pub(crate) fn parse_duration(json: &str) -> Result<u64, ProbeError> {
    let meta: MediaMetadata =
        serde_json::from_str(json).map_err(|e| ProbeError::Parse(e.to_string()))?;

    Ok(meta.duration.map(|d| d.max(0.0) as u64).unwrap_or(0))
}

// ---------------------------------------------------------------------------
// YtDlpProbe
// ---------------------------------------------------------------------------

/// Production probe that shells out to `yt-dlp`.
#[derive(Debug, Default)]
pub struct YtDlpProbe;

impl YtDlpProbe {
    pub fn new() -> Self {
        Self
    }
}

impl DurationProbe for YtDlpProbe {
    fn probe(&self, url: &str) -> Result<u64, ProbeError> {
        log::debug!("probe: fetching metadata for {url}");

        let output = Command::new("yt-dlp")
            .args([
                "--dump-single-json",
                "--skip-download",
                "--no-playlist",
                "--quiet",
                url,
            ])
            .output()
            .map_err(|e| ProbeError::Spawn(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::Engine(stderr.trim().to_string()));
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

// ---------------------------------------------------------------------------
// MockDurationProbe  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured duration or error.
#[cfg(test)]
pub struct MockDurationProbe {
    response: Result<u64, ProbeError>,
}

#[cfg(test)]
impl MockDurationProbe {
    /// Create a mock that always reports `Ok(seconds)`.
    pub fn seconds(seconds: u64) -> Self {
        Self {
            response: Ok(seconds),
        }
    }

    /// Create a mock that always fails.
    pub fn err(error: ProbeError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
impl DurationProbe for MockDurationProbe {
    fn probe(&self, _url: &str) -> Result<u64, ProbeError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- parse_duration ---

    #[test]
    fn parse_whole_duration() {
        assert_eq!(parse_duration(r#"{"duration": 120}"#).unwrap(), 120);
    }

    #[test]
    fn parse_fractional_duration_truncates() {
        assert_eq!(parse_duration(r#"{"duration": 123.7}"#).unwrap(), 123);
    }

    #[test]
    fn missing_duration_is_zero() {
        assert_eq!(parse_duration(r#"{"title": "clip"}"#).unwrap(), 0);
    }

    #[test]
    fn null_duration_is_zero() {
        assert_eq!(parse_duration(r#"{"duration": null}"#).unwrap(), 0);
    }

    #[test]
    fn negative_duration_clamps_to_zero() {
        assert_eq!(parse_duration(r#"{"duration": -5}"#).unwrap(), 0);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = parse_duration("not json").unwrap_err();
        assert!(matches!(err, ProbeError::Parse(_)));
    }

    // --- MockDurationProbe ---

    #[test]
    fn mock_returns_configured_seconds() {
        let probe = MockDurationProbe::seconds(42);
        assert_eq!(probe.probe("ignored").unwrap(), 42);
    }

    #[test]
    fn mock_returns_configured_error() {
        let probe = MockDurationProbe::err(ProbeError::Engine("offline".into()));
        assert!(matches!(
            probe.probe("ignored").unwrap_err(),
            ProbeError::Engine(_)
        ));
    }

    // --- ProbeError display ---

    #[test]
    fn engine_error_display_carries_detail() {
        let e = ProbeError::Engine("404 not found".into());
        assert!(e.to_string().contains("404 not found"));
    }
}
