// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

static LOGGER: StderrLogger = StderrLogger;
static MAX_LEVEL: AtomicUsize = AtomicUsize::new(0);

pub struct StderrLogger;

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  MAX_LEVEL.store(level as usize, Ordering::Relaxed);
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Marker printed in front of every message
fn marker(level: Level) -> &'static str {
  match level {
    Level::Error => "🔴",
    Level::Warn => "🟠",
    Level::Info => "🔵",
    Level::Debug => "⚪",
    Level::Trace => "▫️",
  }
}

impl log::Log for StderrLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    (metadata.level() as usize) <= MAX_LEVEL.load(Ordering::Relaxed)
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      // Format: "🔴  File not found"
      let mut err = std::io::stderr().lock();
      let _ = writeln!(err, "{}  {}", marker(record.level()), record.args());
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
