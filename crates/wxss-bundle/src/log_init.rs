//! A minimal file logger for tools that drive the bundler.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use log::{LevelFilter, Metadata, Record, SetLoggerError};

struct FileLogger {
    path: PathBuf,
    level: LevelFilter,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            let _ = writeln!(file, "[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Appends every record up to `level` to the file at `path` as
/// `[LEVEL] message` lines.
///
/// Fails when a logger is already installed.
pub fn init_logger(path: impl Into<PathBuf>, level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(FileLogger {
        path: path.into(),
        level,
    }))?;
    log::set_max_level(level);
    Ok(())
}
