//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Data dir (models):
//!   Windows: %LOCALAPPDATA%\tube-to-text\models\
//!   macOS:   ~/Library/Application Support/tube-to-text/models/
//!   Linux:   ~/.local/share/tube-to-text/models/
//!
//! Scratch dir (temporary downloaded audio):
//!   the host's standard temporary-file location (`std::env::temp_dir()`).
//!   Files placed there are transient and removed by the pipeline itself.

use std::path::PathBuf;

/// Holds all resolved application directory paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for downloaded GGML model files.
    pub models_dir: PathBuf,
    /// Directory for transient downloaded audio files.
    pub scratch_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "tube-to-text";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard data path (should be extremely rare in practice).
    pub fn new() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self {
            models_dir: data_dir.join("models"),
            scratch_dir: std::env::temp_dir(),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.models_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths.scratch_dir.to_str().is_some_and(|s| !s.is_empty()));
    }

    #[test]
    fn models_dir_ends_with_models() {
        let paths = AppPaths::new();
        assert!(paths.models_dir.file_name().is_some_and(|n| n == "models"));
    }
}
