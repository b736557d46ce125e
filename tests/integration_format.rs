use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use dglog::{DglogFormatter, InstallDir, LineFormatter, LoggerConfig, DEFAULT_COLOR_SCHEME};
use tracing::level_filters::LevelFilter;

/// In-memory sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_with<F: FnOnce()>(formatter: DglogFormatter, max_level: LevelFilter, emit: F) -> Vec<String> {
    colored::control::set_override(true);
    let capture = Capture::default();
    let sink = capture.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_max_level(max_level)
        .event_format(formatter)
        .finish();
    tracing::subscriber::with_default(subscriber, emit);

    capture.lines()
}

fn source_relative_formatter(report_caller: bool) -> DglogFormatter {
    LoggerConfig::default()
        .with_install_dir(InstallDir::SourceLocation)
        .with_report_caller(report_caller)
        .build_formatter()
        .unwrap()
}

/// Absolute path of this file, whichever form `file!()` takes.
fn this_file() -> PathBuf {
    let file = PathBuf::from(file!());
    if file.is_absolute() {
        file
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(file)
    }
}

#[test]
fn tracing_event_renders_one_line() {
    let line_no = line!() + 2;
    let lines = capture_with(source_relative_formatter(true), LevelFilter::DEBUG, || {
        tracing::info!("server started");
    });

    assert_eq!(lines.len(), 1);
    let line = &lines[0];

    // YYYYMMDD.HH:MM:SS
    let (timestamp, rest) = line.split_at(17);
    assert_eq!(timestamp.as_bytes()[8], b'.');
    assert!(timestamp[..8].chars().all(|c| c.is_ascii_digit()));

    assert!(rest.starts_with(" [\x1b[37mI\x1b[0m] server started "), "{rest:?}");
    assert!(
        line.ends_with(&format!("tests/integration_format.rs:{}]", line_no)),
        "{line}"
    );
}

#[test]
fn caller_is_relative_to_install_dir() {
    let install_dir = this_file().parent().unwrap().to_path_buf();
    let formatter = DglogFormatter::new(LineFormatter::with_install_dir(install_dir), true);

    let lines = capture_with(formatter, LevelFilter::DEBUG, || {
        tracing::warn!("disk almost full");
    });

    // Relative `file!()` paths are printed as reported; absolute ones are
    // rewritten against the install directory.
    let expected = if PathBuf::from(file!()).is_absolute() {
        "[integration_format.rs:"
    } else {
        "[tests/integration_format.rs:"
    };
    assert!(lines[0].contains(expected), "{}", lines[0]);
}

#[test]
fn caller_reporting_can_be_disabled() {
    let lines = capture_with(source_relative_formatter(false), LevelFilter::DEBUG, || {
        tracing::error!("no location");
    });

    assert!(lines[0].ends_with(" [:0]"), "{}", lines[0]);
    assert!(lines[0].contains("[\x1b[31mE\x1b[0m]"));
}

#[test]
fn fields_follow_the_message() {
    let lines = capture_with(source_relative_formatter(false), LevelFilter::DEBUG, || {
        tracing::info!(port = 8080, "listening");
    });

    assert!(lines[0].contains("] listening port=8080 "), "{}", lines[0]);
}

#[test]
fn level_filter_drops_verbose_events() {
    let lines = capture_with(source_relative_formatter(false), LevelFilter::DEBUG, || {
        tracing::trace!("hidden");
        tracing::debug!("shown");
    });

    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[\x1b[34mD\x1b[0m] shown"));
}

#[test]
fn trace_events_use_debug_color() {
    let lines = capture_with(source_relative_formatter(false), LevelFilter::TRACE, || {
        tracing::trace!("fine detail");
    });

    assert!(lines[0].contains("[\x1b[34mT\x1b[0m] fine detail"), "{}", lines[0]);
}

#[test]
fn default_scheme_colors_info_green() {
    let formatter = DglogFormatter::new(LineFormatter::new(&DEFAULT_COLOR_SCHEME, "/"), false);
    let lines = capture_with(formatter, LevelFilter::INFO, || {
        tracing::info!("green");
    });

    assert!(lines[0].contains("[\x1b[32mI\x1b[0m] green"), "{}", lines[0]);
}

#[test]
fn long_messages_widen_the_line() {
    let message = "x".repeat(200);
    let lines = capture_with(source_relative_formatter(false), LevelFilter::INFO, || {
        tracing::info!("{}", message);
    });

    assert!(lines[0].contains(&format!("] {} [:0]", message)));
}
