//! File logging for the dialog and for one-shot runs given `--log-file`.
//!
//! `--log-level` sets the level of this crate's events. `RUST_LOG`, when set,
//! replaces that with a full filter directive (e.g. `soundcheck::store=trace`).

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "soundcheck.log";

/// Directory and file name the appender writes to.
fn split_log_path(log_path: &Path) -> (PathBuf, OsString) {
    let dir = match log_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file = log_path
        .file_name()
        .map_or_else(|| OsString::from(DEFAULT_LOG_FILE), OsString::from);
    (dir, file)
}

/// Filter directives: the environment override when present, else `level`
/// for this crate only.
fn directives(from_env: Option<String>, level: &str) -> String {
    from_env
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("soundcheck={level}"))
}

/// Start logging to `log_path` (default [`DEFAULT_LOG_FILE`]).
///
/// Hold the returned guard until exit; dropping it flushes pending lines.
/// Debug builds also record span enter and close.
pub fn init_logging(log_path: Option<&Path>, level: Option<&str>) -> WorkerGuard {
    let log_path = log_path.unwrap_or(Path::new(DEFAULT_LOG_FILE));
    let (dir, file) = split_log_path(log_path);
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));

    let wanted = directives(std::env::var(EnvFilter::DEFAULT_ENV).ok(), level.unwrap_or("info"));
    let filter = EnvFilter::try_new(&wanted).unwrap_or_else(|_| EnvFilter::new("soundcheck=info"));

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false);

    #[cfg(debug_assertions)]
    let layer = layer.with_span_events(fmt::format::FmtSpan::ENTER | fmt::format::FmtSpan::CLOSE);

    tracing_subscriber::registry().with(filter).with(layer).init();
    info!(path = %log_path.display(), filter = %wanted, "logging started");

    guard
}
