#![warn(missing_docs)]

//! Shared logging helpers, CLI argument definitions, and tracing setup for the editor bridge.
//!
//! This crate consolidates logging infrastructure:
//! - CLI argument parsing for log level configuration
//! - Filter spec computation scoped to our crates
//! - [`init`]: install the process-wide subscriber (console + log file)

use std::{
    env, io,
    path::{Path, PathBuf},
};

use clap::Args;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod file;

pub use file::FileSink;

/// Logging controls for CLI apps.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "bridge_engine=trace,bridge_server=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// Final filter spec for these flags; see [`compute_spec`].
    pub fn spec(&self) -> String {
        compute_spec(
            self.trace,
            self.debug,
            self.log_level.as_deref(),
            self.log_filter.as_deref(),
        )
    }
}

/// List of crate targets that constitute "our" logs.
pub fn our_crates() -> &'static [&'static str] {
    &[
        "editor_bridge",
        "bridge_server",
        "bridge_engine",
        "winops",
        "relaykey",
        "logging",
    ]
}

/// Build a filter directive string that sets the same `level` for all of our crates.
pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    our_crates()
        .iter()
        .map(|t| format!("{}={}", t, lvl))
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute the final filter spec string with precedence:
/// - `log_filter`
/// - `trace`/`debug`/`log_level` (crate-scoped)
/// - `RUST_LOG` env
/// - default to crate-scoped `info`
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    if trace {
        return level_spec_for("trace");
    }
    if debug {
        return level_spec_for("debug");
    }
    if let Some(lvl) = log_level {
        return level_spec_for(lvl);
    }
    env::var("RUST_LOG").unwrap_or_else(|_| level_spec_for("info"))
}

/// Create an `EnvFilter` from a spec string.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}

/// Process-wide logging handle returned by [`init`].
///
/// Keep it alive for the life of the process; dropping it flushes the log
/// file. The subscriber itself stays installed.
pub struct LogGuard {
    sink: FileSink,
    path: PathBuf,
}

impl LogGuard {
    /// Path of the log file being appended to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        if let Err(e) = self.sink.flush() {
            eprintln!("failed to flush log file {}: {}", self.path.display(), e);
        }
    }
}

/// Install the global subscriber: `spec` filter, compact console output and
/// a plain-text copy appended to `log_file`.
///
/// Calling this twice leaves the first subscriber in place.
pub fn init(spec: &str, log_file: &Path) -> io::Result<LogGuard> {
    let sink = FileSink::open(log_file)?;
    let installed = tracing_subscriber::registry()
        .with(env_filter_from_spec(spec))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(sink.clone()))
        .try_init()
        .is_ok();
    if installed {
        info!("Logging to: {}", log_file.display());
    } else {
        warn!("tracing subscriber already installed; {} not attached", log_file.display());
    }
    Ok(LogGuard {
        sink,
        path: log_file.to_path_buf(),
    })
}
