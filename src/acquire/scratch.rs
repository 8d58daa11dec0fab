//! Scoped ownership of the downloaded scratch audio file.
//!
//! [`ScratchAudioFile`] guarantees deletion of the temporary file on every
//! exit path of a pipeline run — success, business-logic failure, or panic
//! unwinding — by carrying the removal in `Drop`.  The central resource
//! invariant of the pipeline lives here.

use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ScratchAudioFile
// ---------------------------------------------------------------------------

/// Owns a temporary audio file for the duration of one pipeline run.
///
/// Cleanup semantics:
/// - [`cleanup`](Self::cleanup) is idempotent and tolerant — an
///   already-removed file is a no-op.
/// - A deletion failure is logged as a warning and never propagated, so it
///   cannot override the run's success or error outcome.
/// - `Drop` performs the same cleanup, covering early returns via `?`.
#[derive(Debug)]
pub struct ScratchAudioFile {
    path: PathBuf,
}

impl ScratchAudioFile {
    /// Take ownership of the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The owned path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the owned file if it still exists.  Safe to call any number
    /// of times.
    pub fn cleanup(&self) {
        if !self.path.exists() {
            log::debug!("scratch: {} already gone, nothing to clean", self.path.display());
            return;
        }

        match std::fs::remove_file(&self.path) {
            Ok(()) => log::info!("cleaned up audio file"),
            Err(e) => log::warn!(
                "failed to clean up audio file {}: {e}",
                self.path.display()
            ),
        }
    }
}

impl Drop for ScratchAudioFile {
    fn drop(&mut self) {
        self.cleanup();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
