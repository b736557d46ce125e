//! Log records as seen by the line formatter, decoupled from any particular
//! logging framework's event type.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;

/// Severity of a log record.
///
/// `Fatal` and `Panic` have no `tracing` counterpart; they are reachable
/// through [`crate::LineFormatter`] directly and filter like `Error`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Level {
    /// Lowercase level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }

    /// One-letter tag: the uppercase first character of the level name.
    pub fn tag(&self) -> char {
        self.as_str()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }

    /// Most verbose `tracing` filter that still lets this level through.
    pub fn as_filter(&self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;

        match self {
            Level::Trace => LevelFilter::TRACE,
            Level::Debug => LevelFilter::DEBUG,
            Level::Info => LevelFilter::INFO,
            Level::Warn => LevelFilter::WARN,
            Level::Error | Level::Fatal | Level::Panic => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Source location a record was emitted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caller<'a> {
    pub file: &'a Path,
    pub line: u32,
}

impl<'a> Caller<'a> {
    pub fn new(file: &'a (impl AsRef<Path> + ?Sized), line: u32) -> Self {
        Self {
            file: file.as_ref(),
            line,
        }
    }
}

/// A single record to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogRecord<'a> {
    pub level: Level,
    pub message: &'a str,
    pub caller: Option<Caller<'a>>,
}

impl<'a> LogRecord<'a> {
    pub fn new(level: Level, message: &'a str) -> Self {
        Self {
            level,
            message,
            caller: None,
        }
    }

    pub fn with_caller(mut self, caller: Caller<'a>) -> Self {
        self.caller = Some(caller);
        self
    }
}
