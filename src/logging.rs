//! `log` backend that appends to a file, since the TUI owns stdout.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

struct FileLogger {
    file: Mutex<File>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Installs the file logger. Truncates `path`. Fails if a logger is already set.
pub fn init_file(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let file = OpenOptions::new().create(true).write(true).truncate(true).open(path)?;
    log::set_boxed_logger(Box::new(FileLogger { file: Mutex::new(file) }))?;
    log::set_max_level(level);
    log::info!("logging to {} at {}", path.display(), level);
    Ok(())
}
