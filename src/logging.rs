/*!
 * Stderr logger for the `log` facade.
 *
 * Lines are written as `HH:MM:SS.mmm <marker> message`, colour-coded by level.
 */

use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::app_config::LogLevel;

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @returns: Marker for log level
    fn marker_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => " ",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI colour sequence for log level
    fn colour_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let mut stderr = std::io::stderr();
        let _ = writeln!(
            stderr,
            "{}{} {} {}\x1B[0m",
            Self::colour_for_level(record.level()),
            now,
            Self::marker_for_level(record.level()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

impl From<&LogLevel> for LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Install the stderr logger at the given level.
///
/// When a logger is already installed (by an embedding application or an
/// earlier call) only the maximum level is updated.
pub fn init_logging(level: &LogLevel) {
    let filter = LevelFilter::from(level);

    // Install at Trace so later calls can raise verbosity through set_max_level
    if log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace))).is_err() {
        log::debug!("Logger already installed, updating level to {}", filter);
    }
    log::set_max_level(filter);
}
