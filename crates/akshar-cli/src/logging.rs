// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Logging setup: warnings to the terminal, everything to a log file next to
// the executable.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE: &str = "akshar.log";

/// What was set up, for messages that point the user at the log.
#[derive(Debug, Clone)]
pub struct LogHandle {
    /// `None` when the log directory was not writable.
    pub path: Option<PathBuf>,
}

/// Initialise the global subscriber.
///
/// `RUST_LOG` controls what is recorded (default `info`). The terminal only
/// shows warnings and errors unless `verbose` is set.
pub fn init(verbose: bool) -> LogHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_level = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_level);

    let dir = log_dir();
    let appender = file_appender(&dir);
    let path = appender.as_ref().map(|_| dir.join(LOG_FILE));
    let file_layer = appender.map(|appender| fmt::layer().with_writer(appender).with_ansi(false));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    LogHandle { path }
}

/// Directory of the running executable, falling back to the working directory.
pub fn log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Appending, never-rotating file writer, or `None` if it cannot be created.
fn file_appender(dir: &Path) -> Option<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)
        .ok()
}
