//! Serial-console backend for the `log` facade.
//!
//! Records are written as one line each, prefixed with a coloured level tag:
//!
//! ```text
//! \x1b[33m[ WARN]\x1b[0m pool: exhausted, all 64 slots in use
//! ```
//!
//! The sink is anything implementing [`core::fmt::Write`]: a UART on target,
//! a `String` in tests.
#![no_std]

#[cfg(test)]
extern crate std;

use core::fmt::{self, Write};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

/// Fixed-width tag for a level.
pub fn level_str(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRACE",
        Level::Debug => "DEBUG",
        Level::Info => " INFO",
        Level::Warn => " WARN",
        Level::Error => "ERROR",
    }
}

/// ANSI colour for a level.
pub fn level_color(level: Level) -> &'static str {
    match level {
        Level::Trace => "\x1b[90m", // Gray
        Level::Debug => "\x1b[36m", // Cyan
        Level::Info => "\x1b[32m",  // Green
        Level::Warn => "\x1b[33m",  // Yellow
        Level::Error => "\x1b[31m", // Red
    }
}

/// A logger writing into a locked sink.
pub struct Logger<W> {
    sink: Mutex<W>,
    level: LevelFilter,
}

impl<W: Write + Send> Logger<W> {
    pub const fn new(sink: W, level: LevelFilter) -> Self {
        Self {
            sink: Mutex::new(sink),
            level,
        }
    }

    /// Run `f` with exclusive access to the sink.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.sink.lock())
    }

    fn write_record(&self, sink: &mut W, level: Level, args: &fmt::Arguments) -> fmt::Result {
        writeln!(
            sink,
            "{}[{}]\x1b[0m {}",
            level_color(level),
            level_str(level),
            args
        )
    }
}

impl<W: Write + Send> Log for Logger<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut sink = self.sink.lock();
        // A console that drops bytes has nowhere to report it.
        let _ = self.write_record(&mut sink, record.level(), record.args());
    }

    fn flush(&self) {}
}

/// Install `logger` as the global logger.
pub fn init<W: Write + Send>(logger: &'static Logger<W>) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::string::String;

    #[test]
    fn formats_level_tag_and_message() {
        let logger = Logger::new(String::new(), LevelFilter::Info);
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("pool: exhausted, all {} slots in use", 2))
                .build(),
        );
        logger.with_sink(|s| {
            assert_eq!(s.as_str(), "\x1b[33m[ WARN]\x1b[0m pool: exhausted, all 2 slots in use\n");
        });
    }

    #[test]
    fn drops_records_below_filter() {
        let logger = Logger::new(String::new(), LevelFilter::Info);
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("mutex: init on pool slot 0"))
                .build(),
        );
        logger.with_sink(|s| assert!(s.is_empty()));
    }
}
