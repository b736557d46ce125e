use clap::Parser;
use std::path::PathBuf;

use crate::color::{ColorScheme, StyleSlot, LEVEL_COLOR_SCHEME};
use crate::config::{ColorMode, LoggerConfig, Sink};
use crate::paths::InstallDir;
use crate::record::Level;

/// dglog demo - emit sample log lines through the dglog formatter
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Messages to log (one line per level when omitted)
    pub messages: Vec<String>,

    /// Minimum level written
    #[clap(short = 'l', long, value_enum, default_value_t = Level::Debug)]
    pub level: Level,

    /// Level the given messages are logged at
    #[clap(long, value_enum, default_value_t = Level::Info)]
    pub at: Level,

    /// Write to stderr instead of stdout
    #[clap(long, default_value_t = false)]
    pub stderr: bool,

    /// Append lines to this file instead of a terminal stream
    #[clap(long)]
    pub log_file: Option<PathBuf>,

    /// Omit caller file and line
    #[clap(long, default_value_t = false)]
    pub no_caller: bool,

    /// When to color level tags
    #[clap(long, value_enum, default_value_t = ColorMode::Always)]
    pub color: ColorMode,

    /// Directory caller paths are made relative to (auto-detected by default)
    #[clap(long)]
    pub install_dir: Option<PathBuf>,

    /// Let RUST_LOG override --level
    #[clap(long, default_value_t = false)]
    pub env_filter: bool,

    /// Style of the debug tag (e.g. "blue", "black+h", "white:red")
    #[clap(long, help_heading = "Styles")]
    pub debug_style: Option<String>,

    /// Style of the info tag
    #[clap(long, help_heading = "Styles")]
    pub info_style: Option<String>,

    /// Style of the warn tag
    #[clap(long, help_heading = "Styles")]
    pub warn_style: Option<String>,

    /// Style of the error tag
    #[clap(long, help_heading = "Styles")]
    pub error_style: Option<String>,
}

impl Args {
    /// Scheme built from the style flags on top of the level scheme.
    ///
    /// An empty flag value clears the slot so the default style applies.
    pub fn color_scheme(&self) -> ColorScheme {
        let overrides = [
            (StyleSlot::Debug, &self.debug_style),
            (StyleSlot::Info, &self.info_style),
            (StyleSlot::Warn, &self.warn_style),
            (StyleSlot::Error, &self.error_style),
        ];

        let mut scheme = LEVEL_COLOR_SCHEME;
        for (slot, style) in overrides {
            if let Some(style) = style {
                scheme.set_style(slot, style.clone());
            }
        }
        scheme
    }
}

impl From<&Args> for LoggerConfig {
    fn from(args: &Args) -> Self {
        let sink = match (&args.log_file, args.stderr) {
            (Some(path), _) => Sink::File(path.clone()),
            (None, true) => Sink::Stderr,
            (None, false) => Sink::Stdout,
        };
        let install_dir = match &args.install_dir {
            Some(dir) => InstallDir::Fixed(dir.clone()),
            None => InstallDir::Auto,
        };

        LoggerConfig::default()
            .with_level(args.level)
            .with_sink(sink)
            .with_report_caller(!args.no_caller)
            .with_color_scheme(args.color_scheme())
            .with_install_dir(install_dir)
            .with_color(args.color)
            .with_env_filter(args.env_filter)
    }
}
