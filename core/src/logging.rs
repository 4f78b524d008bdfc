//! Subscriber setup shared by the binaries.
//!
//! Output goes to stderr unless `ENCHANTS_LOG_PATH` names a file, which is
//! then appended to without ANSI colors. `RUST_LOG` overrides the level.

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};

use tracing::Level;
use tracing_subscriber::EnvFilter;

pub const LOG_PATH_ENV: &str = "ENCHANTS_LOG_PATH";

pub fn init_logging(default_level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    match std::env::var_os(LOG_PATH_ENV).and_then(|path| open_log_file(&path)) {
        Some(file) => subscriber.with_ansi(false).with_writer(file).init(),
        None => subscriber.with_writer(std::io::stderr).init(),
    }
}

/// Open `path` for appending; unusable paths fall back to stderr
fn open_log_file(path: &OsStr) -> Option<File> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Cannot open log file {}: {e}", path.to_string_lossy());
            None
        }
    }
}
