//! # Logger Configuration and Initialization
//!
//! [`init`] installs the global `tracing` subscriber once, at startup. The
//! defaults mirror what most hosts want: everything from `debug` up, written
//! to stdout, caller locations on, level tags colored.
//!
//! ```rust,no_run
//! use dglog::{init, Level, LoggerConfig};
//!
//! # fn main() -> Result<(), dglog::InitError> {
//! init(LoggerConfig::default().with_level(Level::Info))?;
//! tracing::info!("server started");
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use clap::ValueEnum;
use thiserror::Error;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::color::{ColorScheme, LEVEL_COLOR_SCHEME};
use crate::logging::{DglogFormatter, LineFormatter};
use crate::paths::{InstallDir, PathError};
use crate::record::Level;

/// Errors returned by [`init`].
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    InstallDir(#[from] PathError),

    #[error("invalid log file path {}: no file name", .0.display())]
    Sink(PathBuf),

    #[error("failed to open log file: {0}")]
    LogFile(#[from] tracing_appender::rolling::InitError),

    #[error("failed to install the global subscriber: {0}")]
    Subscriber(String),
}

/// Where formatted lines are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Sink {
    #[default]
    Stdout,
    Stderr,
    /// Append to a single file that is never rotated.
    File(PathBuf),
}

impl Sink {
    fn make_writer(&self) -> Result<BoxMakeWriter, InitError> {
        Ok(match self {
            Sink::Stdout => BoxMakeWriter::new(std::io::stdout),
            Sink::Stderr => BoxMakeWriter::new(std::io::stderr),
            Sink::File(path) => {
                let name = path
                    .file_name()
                    .ok_or_else(|| InitError::Sink(path.clone()))?;
                let dir = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::NEVER)
                    .filename_prefix(name.to_string_lossy())
                    .build(dir)?;
                BoxMakeWriter::new(appender)
            }
        })
    }
}

/// When to emit ANSI escapes around level tags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always color, whatever the sink.
    #[default]
    Always,
    /// Color only when stdout is a terminal and `NO_COLOR` is unset.
    Auto,
    /// Never color.
    Never,
}

impl ColorMode {
    fn apply(self) {
        match self {
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
            ColorMode::Auto => colored::control::unset_override(),
        }
    }
}

/// Configuration consumed by [`init`].
#[derive(Clone, Debug)]
pub struct LoggerConfig {
    /// Minimum level written.
    pub level: Level,
    pub sink: Sink,
    /// Whether to annotate lines with the emitting file and line.
    pub report_caller: bool,
    /// Styles for the level tags. Empty slots use the default scheme.
    pub color_scheme: ColorScheme,
    pub install_dir: InstallDir,
    pub color: ColorMode,
    /// Let `RUST_LOG` override `level`.
    pub env_filter: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            sink: Sink::Stdout,
            report_caller: true,
            color_scheme: LEVEL_COLOR_SCHEME,
            install_dir: InstallDir::Auto,
            color: ColorMode::Always,
            env_filter: false,
        }
    }
}

impl LoggerConfig {
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_sink(mut self, sink: Sink) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_report_caller(mut self, report_caller: bool) -> Self {
        self.report_caller = report_caller;
        self
    }

    pub fn with_color_scheme(mut self, color_scheme: ColorScheme) -> Self {
        self.color_scheme = color_scheme;
        self
    }

    pub fn with_install_dir(mut self, install_dir: InstallDir) -> Self {
        self.install_dir = install_dir;
        self
    }

    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    pub fn with_env_filter(mut self, env_filter: bool) -> Self {
        self.env_filter = env_filter;
        self
    }

    /// Resolve the install directory and build the event formatter.
    pub fn build_formatter(&self) -> Result<DglogFormatter, InitError> {
        let install_dir = self.install_dir.resolve()?;
        let line = LineFormatter::new(&self.color_scheme, install_dir);
        Ok(DglogFormatter::new(line, self.report_caller))
    }
}

/// Install the global subscriber described by `config`.
///
/// Meant to be called once from the host's startup sequence. A failure to
/// locate the running executable is reported as [`InitError::InstallDir`];
/// hosts are expected to treat it as fatal.
pub fn init(config: LoggerConfig) -> Result<(), InitError> {
    let formatter = config.build_formatter()?;
    let writer = config.sink.make_writer()?;
    config.color.apply();

    let builder = tracing_subscriber::fmt()
        .with_writer(writer)
        .event_format(formatter);

    let installed = if config.env_filter {
        let filter = EnvFilter::builder()
            .with_default_directive(config.level.as_filter().into())
            .from_env_lossy();
        builder.with_env_filter(filter).try_init()
    } else {
        builder.with_max_level(config.level.as_filter()).try_init()
    };
    installed.map_err(|e| InitError::Subscriber(e.to_string()))
}
