//! # dglog demo - Main Entry Point
//!
//! Installs the dglog formatter as the global `tracing` subscriber and emits
//! sample lines, so a scheme or install directory can be checked by eye.
//!
//! Failing to locate the running executable is fatal: the error goes to
//! stderr and the process exits with status 1.

use anyhow::Result;
use clap::Parser;
use dglog::{cli::Args, init, Level, LoggerConfig};
use tracing::{debug, error, info, trace, warn};

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = init(LoggerConfig::from(&args)) {
        eprintln!("dglog-demo: failed to initialize logging: {e}");
        std::process::exit(1);
    }

    debug!("dglog {} initialized: {:?}", dglog::VERSION, args);

    if args.messages.is_empty() {
        trace!("trace line");
        debug!("debug line");
        info!("server started");
        warn!(retries = 3, "upstream slow");
        error!("request failed");
        return Ok(());
    }

    for message in &args.messages {
        match args.at {
            Level::Trace => trace!("{message}"),
            Level::Debug => debug!("{message}"),
            Level::Info => info!("{message}"),
            Level::Warn => warn!("{message}"),
            Level::Error | Level::Fatal | Level::Panic => error!("{message}"),
        }
    }
    Ok(())
}
