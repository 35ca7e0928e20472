//! Tracing setup for the dashboard server.
//!
//! `RUST_LOG` wins over the configured level when set.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{Result, RevdashError};

/// Level named in configuration; unknown names fall back to `info`.
fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => LevelFilter::WARN,
        other => other.parse().unwrap_or(LevelFilter::INFO),
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_filter(level).into())
        .from_env_lossy()
}

fn open_log_file(path: &str) -> Result<File> {
    if let Some(dir) = Path::new(path).parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(File::options().create(true).append(true).open(path)?)
}

/// Log to stdout and append to the configured file.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let file = Arc::new(open_log_file(&config.file)?);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.level))
        .with_writer(std::io::stdout.and(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| RevdashError::Config(format!("logging already initialized: {e}")))
}

/// Log to stdout only. Used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .try_init();
}
