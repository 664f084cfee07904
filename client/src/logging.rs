//! Log setup. The terminal belongs to the arena, so logs can be sent to a file.

use crate::error::ClientError;
use env_logger::{Builder, Env, Target, DEFAULT_FILTER_ENV};
use log::LevelFilter;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;

/// Creates `<prefix><N>.txt` for the smallest N ≥ 1 that does not exist yet.
///
/// Several clients started from the same directory each get their own file.
pub fn open_unique_log(prefix: &str) -> io::Result<(PathBuf, File)> {
    for id in 1..=u32::MAX {
        let path = PathBuf::from(format!("{prefix}{id}.txt"));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free log file name for prefix {prefix}"),
    ))
}

/// File prefix used when `RUST_LOG` asks for logs but `--log-file` was not given.
pub const DEFAULT_LOG_PREFIX: &str = "dotgrid-client";

/// Picks where logs go. An explicit prefix wins; otherwise a non-empty
/// `RUST_LOG` selects [`DEFAULT_LOG_PREFIX`], since stderr is the arena.
pub fn log_prefix<'a>(explicit: Option<&'a str>, rust_log: Option<&str>) -> Option<&'a str> {
    match (explicit, rust_log) {
        (Some(prefix), _) => Some(prefix),
        (None, Some(filter)) if !filter.trim().is_empty() => Some(DEFAULT_LOG_PREFIX),
        _ => None,
    }
}

/// Installs the global logger. `RUST_LOG` picks the level; when logging to a
/// file the default is `info`. Without a file nothing is logged, so no text
/// lands on top of the arena.
pub fn init_logging(explicit: Option<&str>) -> Result<Option<PathBuf>, ClientError> {
    let rust_log = std::env::var(DEFAULT_FILTER_ENV).ok();
    let Some(prefix) = log_prefix(explicit, rust_log.as_deref()) else {
        Builder::new().filter_level(LevelFilter::Off).init();
        return Ok(None);
    };

    let (path, file) = open_unique_log(prefix).map_err(ClientError::LogFile)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();

    Ok(Some(path))
}
