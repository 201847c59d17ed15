/// File-backed `log` backend.
///
/// The terminal belongs to the alternate screen while running, so log
/// lines go to a file instead: `<elapsed-ms> LEVEL target: message`.
/// Without a configured file the max level stays `Off` and every
/// `log::` macro is a cheap no-op.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

use crate::config::LogConfig;

struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
    started: Instant,
}

impl FileLogger {
    fn line(&self, record: &Record) -> String {
        format!(
            "{:>8} {:<5} {}: {}\n",
            self.started.elapsed().as_millis(),
            record.level(),
            record.target(),
            record.args(),
        )
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.line(record);
        if let Ok(mut file) = self.file.lock() {
            // nowhere to report a failed log write
            let _ = file.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Install the logger described by `config`. Safe to call once per process.
pub fn init(config: &LogConfig) -> io::Result<()> {
    let path = match &config.file {
        Some(p) => p,
        None => {
            log::set_max_level(LevelFilter::Off);
            return Ok(());
        }
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let logger = FileLogger {
        file: Mutex::new(file),
        level: config.level,
        started: Instant::now(),
    };

    log::set_logger(Box::leak(Box::new(logger)))
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;
    log::set_max_level(config.level);
    Ok(())
}
