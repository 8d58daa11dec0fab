//! Audio acquisition via the external download/extract engine.
//!
//! [`AudioAcquirer`] is the public interface used by the pipeline.
//! [`YtDlpAcquirer`] is the production implementation: it invokes `yt-dlp`
//! requesting best-available audio extracted to mp3 under a uniquely named
//! base path in the scratch directory.
//!
//! yt-dlp does not guarantee the extension of the file it leaves behind —
//! the mp3 post-processor can be skipped when the source container already
//! matches, and some extractors keep the original container.  The acquirer
//! therefore probes a fixed, ordered list of candidate extensions
//! ([`CANDIDATE_EXTENSIONS`]) and returns the first path that exists.
//!
//! On success exactly one file is left on disk at the returned path.
//! Ownership of that file transfers to the caller, which is responsible for
//! deletion (see [`ScratchAudioFile`](super::ScratchAudioFile)).

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// DownloadError
// ---------------------------------------------------------------------------

/// All errors that can arise while acquiring audio.
#[derive(Debug, Clone, Error)]
pub enum DownloadError {
    /// The `yt-dlp` binary could not be spawned at all.
    #[error("failed to run yt-dlp — is it installed? ({0})")]
    Spawn(String),

    /// `yt-dlp` ran but exited non-zero.
    #[error("download failed: {0}")]
    Engine(String),

    /// `yt-dlp` exited successfully but no output file matched any
    /// candidate extension.
    #[error("no output file produced")]
    NoOutput,
}

// ---------------------------------------------------------------------------
// AudioAcquirer trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for audio acquisition.
///
/// # Contract
///
/// - On success, exactly one file exists at the returned path.
/// - The returned path is unique per call; concurrent invocations never
///   collide.
/// - The caller owns the returned file and must delete it.
pub trait AudioAcquirer: Send + Sync {
    /// Download and extract the audio track for `url` into the scratch
    /// directory, returning the path of the produced file.
    fn acquire(&self, url: &str) -> Result<PathBuf, DownloadError>;
}

// Compile-time assertion: Box<dyn AudioAcquirer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn AudioAcquirer>) {}
};

// ---------------------------------------------------------------------------
// Candidate extension probing
// ---------------------------------------------------------------------------

/// Extensions the produced file may carry, in probe order.  The normalized
/// codec (mp3) comes first, then common source containers, then
/// extensionless — yt-dlp writes the bare output template when it cannot
/// determine a container.
pub const CANDIDATE_EXTENSIONS: &[&str] = &["mp3", "webm", "m4a", "mp4", "mkv", ""];

/// Return the first path `base.<ext>` (or bare `base`) that exists on disk,
/// walking [`CANDIDATE_EXTENSIONS`] in order.
pub(crate) fn locate_output(base: &Path) -> Option<PathBuf> {
    CANDIDATE_EXTENSIONS
        .iter()
        .map(|ext| {
            if ext.is_empty() {
                base.to_path_buf()
            } else {
                PathBuf::from(format!("{}.{ext}", base.display()))
            }
        })
        .find(|candidate| candidate.exists())
}

// ---------------------------------------------------------------------------
// YtDlpAcquirer
// ---------------------------------------------------------------------------

/// Production acquirer that shells out to `yt-dlp`.
#[derive(Debug, Clone)]
pub struct YtDlpAcquirer {
    scratch_dir: PathBuf,
}

impl YtDlpAcquirer {
    /// Create an acquirer writing into `scratch_dir`.
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Generate a globally-unique base path (no extension) in the scratch
    /// directory.  Uniqueness is the only safeguard against collisions
    /// across concurrent invocations.
    fn unique_base(&self) -> PathBuf {
        self.scratch_dir.join(format!("tube_{}", Uuid::new_v4()))
    }
}

impl AudioAcquirer for YtDlpAcquirer {
    fn acquire(&self, url: &str) -> Result<PathBuf, DownloadError> {
        let base = self.unique_base();
        log::info!("starting download for {url}");

        let output = Command::new("yt-dlp")
            .args(["-f", "bestaudio/best"])
            .args(["--extract-audio", "--audio-format", "mp3"])
            .arg("--no-playlist")
            .arg("-o")
            .arg(&base)
            .arg(url)
            .output()
            .map_err(|e| DownloadError::Spawn(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::Engine(stderr.trim().to_string()));
        }

        match locate_output(&base) {
            Some(path) => {
                log::info!("found audio file: {}", path.display());
                Ok(path)
            }
            None => Err(DownloadError::NoOutput),
        }
    }
}

// ---------------------------------------------------------------------------
// MockAudioAcquirer  (test-only)
// ---------------------------------------------------------------------------

/// A test double that produces a real file, a missing path, or an error —
/// and counts how often it was called, so tests can assert the admission
/// check short-circuits before any download.
#[cfg(test)]
pub struct MockAudioAcquirer {
    behaviour: MockBehaviour,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
enum MockBehaviour {
    /// Write a small file at the path on every call and return it.
    Produce(PathBuf),
    /// Return the path without creating anything.
    Missing(PathBuf),
    /// Fail with the given error.
    Fail(DownloadError),
}

#[cfg(test)]
impl MockAudioAcquirer {
    /// Acquirer that writes a real file at `path` and returns it.
    pub fn producing(path: impl Into<PathBuf>) -> Self {
        Self {
            behaviour: MockBehaviour::Produce(path.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Acquirer that returns `path` without creating a file there.
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self {
            behaviour: MockBehaviour::Missing(path.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Acquirer that always fails with `error`.
    pub fn failing(error: DownloadError) -> Self {
        Self {
            behaviour: MockBehaviour::Fail(error),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of `acquire` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl AudioAcquirer for MockAudioAcquirer {
    fn acquire(&self, _url: &str) -> Result<PathBuf, DownloadError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.behaviour {
            MockBehaviour::Produce(path) => {
                std::fs::write(path, b"audio").map_err(|e| DownloadError::Engine(e.to_string()))?;
                Ok(path.clone())
            }
            MockBehaviour::Missing(path) => Ok(path.clone()),
            MockBehaviour::Fail(error) => Err(error.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // --- locate_output ---

    #[test]
    fn finds_mp3_output() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("clip");
        fs::write(base.with_extension("mp3"), b"x").unwrap();

        let found = locate_output(&base).unwrap();
        assert_eq!(found, base.with_extension("mp3"));
    }

    #[test]
    fn finds_webm_when_mp3_absent() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("clip");
        fs::write(base.with_extension("webm"), b"x").unwrap();

        let found = locate_output(&base).unwrap();
        assert_eq!(found, base.with_extension("webm"));
    }

    #[test]
    fn mp3_wins_over_webm() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("clip");
        fs::write(base.with_extension("mp3"), b"x").unwrap();
        fs::write(base.with_extension("webm"), b"x").unwrap();

        let found = locate_output(&base).unwrap();
        assert_eq!(found, base.with_extension("mp3"));
    }

    #[test]
    fn falls_back_to_extensionless() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("clip");
        fs::write(&base, b"x").unwrap();

        let found = locate_output(&base).unwrap();
        assert_eq!(found, base);
    }

    #[test]
    fn no_candidate_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("clip");
        assert!(locate_output(&base).is_none());
    }

    // --- unique_base ---

    #[test]
    fn unique_base_never_repeats() {
        let acq = YtDlpAcquirer::new(std::env::temp_dir());
        assert_ne!(acq.unique_base(), acq.unique_base());
    }

    #[test]
    fn unique_base_lives_in_scratch_dir() {
        let dir = tempfile::tempdir().unwrap();
        let acq = YtDlpAcquirer::new(dir.path());
        assert!(acq.unique_base().starts_with(dir.path()));
    }

    // --- DownloadError display ---

    #[test]
    fn no_output_display() {
        assert_eq!(DownloadError::NoOutput.to_string(), "no output file produced");
    }
}
