//! A file logger for hosts without their own `log` backend.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

const MAX_LEVEL: LevelFilter = LevelFilter::Debug;

struct FileLogger {
    path: PathBuf,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= MAX_LEVEL
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) else {
            return;
        };
        let _ = writeln!(file, "[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

/// Appends every record at `Debug` or above to the file at `path`, one
/// `[LEVEL] message` line each.
///
/// Fails if a logger is already installed.
pub fn init_logger(path: impl AsRef<Path>) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(FileLogger {
        path: path.as_ref().to_path_buf(),
    }))?;
    log::set_max_level(MAX_LEVEL);
    Ok(())
}
