//! Binary entry point — tube-to-text.
//!
//! # Startup sequence
//!
//! 1. Initialise logging (severity glyphs + timestamps, stderr only).
//! 2. Read the single URL argument.
//! 3. Wire the production pipeline components.
//! 4. Run the pipeline.
//! 5. Print the transcript to stdout (exit 0) or report the error (exit 1).
//!
//! stdout carries the transcript and nothing else; every diagnostic line
//! goes to stderr so the output can be piped or captured from a job queue.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use tube_to_text::{
    acquire::YtDlpAcquirer,
    config::{AppPaths, PipelineConfig},
    pipeline::{PipelineOrchestrator, TranscriptionRequest},
    probe::YtDlpProbe,
    stt::{ModelPaths, WhisperEngine},
};

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Severity glyph for a log level, mirrored on every stderr line.
fn glyph(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "❌",
        log::Level::Warn => "⚠️",
        log::Level::Info => "ℹ️",
        log::Level::Debug | log::Level::Trace => "·",
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                glyph(record.level()),
                buf.timestamp_seconds(),
                record.args()
            )
        })
        .init();
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    // 1. Logging
    init_logging();

    // 2. Single URL argument
    let Some(url) = std::env::args().nth(1) else {
        log::error!("usage: tube-to-text <URL>");
        return ExitCode::FAILURE;
    };

    // 3. Production components
    let paths = AppPaths::new();
    let mut orchestrator = PipelineOrchestrator::new(
        PipelineConfig::default(),
        Arc::new(YtDlpProbe::new()),
        Arc::new(YtDlpAcquirer::new(paths.scratch_dir)),
        Arc::new(WhisperEngine::new(ModelPaths::new())),
    );

    // 4-5. Run and report
    match orchestrator.run(&TranscriptionRequest::new(url)) {
        Ok(transcript) => {
            println!("{}", transcript.text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("fatal error: {e}");
            ExitCode::FAILURE
        }
    }
}
