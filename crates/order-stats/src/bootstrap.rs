use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `DEBUG`/`INFO`/`WARNING`/`ERROR`/`CRITICAL` level name to a tracing
/// filter directive. Unknown names pass through unchanged.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Open `path` for appending, creating missing parent directories.
pub fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Initialise the global `tracing` subscriber.
///
/// Events go to stderr and, when `log_file` is set, are also appended to that
/// file without ANSI colours. Falls back to `warn` if the level is not
/// recognised.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(Mutex::new(open_log_file(path)?))
                .with_ansi(false)
                .with_target(true),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("installing the tracing subscriber")?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
