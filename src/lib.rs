//! # dglog
//!
//! A single-line, color-coded log formatter for `tracing`.
//!
//! Every event becomes one line:
//!
//! ```text
//! 20240305.14:07:09 [I] server started                                   ...   [server/main.rs:42]
//! ```
//!
//! - a local timestamp in `YYYYMMDD.HH:MM:SS` form
//! - the level's first letter, colored per level
//! - the message, padded to 120 columns (never truncated)
//! - the caller's `file:line`, relative to the install directory
//!
//! ## Architecture Overview
//!
//! - `color`: compiles declarative color schemes into ANSI transforms
//! - `logging`: the line formatter and its `tracing-subscriber` adapter
//! - `paths`: install-directory resolution and caller path rewriting
//! - `config`: logger configuration and the one-time [`init`]
//! - `record`: framework-independent levels and records
//! - `cli`: command-line options of the `dglog-demo` binary
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use dglog::{init, LoggerConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init(LoggerConfig::default())?;
//!     tracing::info!("server started");
//!     Ok(())
//! }
//! ```

/// Color scheme compilation
///
/// Maps style names such as `"green"` or `"black+h"` onto ANSI transforms,
/// with a per-slot fallback to the built-in default scheme.
pub mod color;

/// Command-line interface of the demo binary
pub mod cli;

/// Logger configuration and global subscriber installation
pub mod config;

/// Line formatting
///
/// Contains the framework-agnostic `LineFormatter` and the `DglogFormatter`
/// adapter implementing `tracing-subscriber`'s `FormatEvent`.
pub mod logging;

/// Install directory resolution and caller path rewriting
pub mod paths;

pub mod record;

pub use color::{
    compile, ColorScheme, ColorTransform, CompiledColorScheme, StyleSlot, DEFAULT_COLOR_SCHEME,
    LEVEL_COLOR_SCHEME,
};
pub use config::{init, ColorMode, InitError, LoggerConfig, Sink};
pub use logging::{DglogFormatter, LineFormatter};
pub use paths::{InstallDir, PathError};
pub use record::{Caller, Level, LogRecord};

/// The current version of dglog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
