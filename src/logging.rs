//! # Line Formatting
//!
//! Renders one record per line:
//!
//! ```text
//! 20240305.14:07:09 [I] server started<padding to 120 columns> [server/main.rs:42]
//! ```
//!
//! Only the level letter is colored. [`LineFormatter`] is framework-agnostic;
//! [`DglogFormatter`] plugs it into `tracing-subscriber`'s fmt layer.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

use crate::color::{compile, ColorScheme, CompiledColorScheme, LEVEL_COLOR_SCHEME};
use crate::paths::relative_caller_path;
use crate::record::{Caller, Level, LogRecord};

/// `chrono` format string for the leading timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d.%H:%M:%S";

/// Minimum width of the message column.
pub const MESSAGE_WIDTH: usize = 120;

/// Formats records into single lines.
///
/// The color scheme is compiled and the install directory fixed when the
/// formatter is built, so formatting itself touches no shared state.
#[derive(Clone, Debug)]
pub struct LineFormatter {
    colors: CompiledColorScheme,
    install_dir: PathBuf,
}

impl LineFormatter {
    /// Build a formatter coloring level tags with `scheme`.
    pub fn new(scheme: &ColorScheme, install_dir: impl Into<PathBuf>) -> Self {
        Self {
            colors: compile(scheme),
            install_dir: install_dir.into(),
        }
    }

    /// Formatter using [`LEVEL_COLOR_SCHEME`].
    pub fn with_install_dir(install_dir: impl Into<PathBuf>) -> Self {
        Self::new(&LEVEL_COLOR_SCHEME, install_dir)
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn colors(&self) -> &CompiledColorScheme {
        &self.colors
    }

    /// Colored one-letter tag for `level`.
    pub fn level_tag(&self, level: Level) -> String {
        let mut buf = [0u8; 4];
        let tag = level.tag().encode_utf8(&mut buf);
        self.colors.level_color(level).apply(tag)
    }

    /// Write `record`, stamped with `timestamp`, to `out`.
    pub fn write_record<W: fmt::Write + ?Sized>(
        &self,
        out: &mut W,
        record: &LogRecord<'_>,
        timestamp: DateTime<Local>,
    ) -> fmt::Result {
        let (file, line) = match record.caller {
            Some(Caller { file, line }) => (relative_caller_path(&self.install_dir, file), line),
            None => (PathBuf::new(), 0),
        };

        writeln!(
            out,
            "{} [{}] {:<width$} [{}:{}]",
            timestamp.format(TIMESTAMP_FORMAT),
            self.level_tag(record.level),
            record.message,
            file.display(),
            line,
            width = MESSAGE_WIDTH,
        )
    }

    /// Format `record` with an explicit timestamp.
    pub fn format_at(&self, record: &LogRecord<'_>, timestamp: DateTime<Local>) -> Vec<u8> {
        let mut line = String::with_capacity(MESSAGE_WIDTH + 48);
        // Writing into a String cannot fail.
        let _ = self.write_record(&mut line, record, timestamp);
        line.into_bytes()
    }

    /// Format `record` stamped with the current local time.
    pub fn format(&self, record: &LogRecord<'_>) -> Vec<u8> {
        self.format_at(record, Local::now())
    }
}

/// `tracing-subscriber` event formatter backed by a [`LineFormatter`].
///
/// The event's fields (message first) make up the message column. Caller
/// location comes from the event's metadata when caller reporting is on.
#[derive(Clone, Debug)]
pub struct DglogFormatter {
    line: LineFormatter,
    report_caller: bool,
}

impl DglogFormatter {
    pub fn new(line: LineFormatter, report_caller: bool) -> Self {
        Self {
            line,
            report_caller,
        }
    }

    pub fn line_formatter(&self) -> &LineFormatter {
        &self.line
    }
}

impl<S, N> FormatEvent<S, N> for DglogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        // Buffer the fields so the message column can be padded as a whole.
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        let metadata = event.metadata();
        let caller = match (self.report_caller, metadata.file(), metadata.line()) {
            (true, Some(file), Some(line)) => Some(Caller::new(file, line)),
            _ => None,
        };

        let record = LogRecord {
            level: Level::from(*metadata.level()),
            message: &message,
            caller,
        };
        self.line.write_record(&mut writer, &record, Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    fn formatter() -> LineFormatter {
        colored::control::set_override(true);
        LineFormatter::with_install_dir("/app/bin")
    }

    fn render(record: &LogRecord<'_>) -> String {
        String::from_utf8(formatter().format_at(record, fixed_time())).unwrap()
    }

    #[test]
    fn test_timestamp_format() {
        let line = render(&LogRecord::new(Level::Info, "x"));
        assert!(line.starts_with("20240305.14:07:09 ["), "{line}");
    }

    #[test]
    fn test_full_line_with_caller() {
        let record = LogRecord::new(Level::Info, "server started")
            .with_caller(Caller::new("/app/bin/server/main.go", 42));

        let expected = format!(
            "20240305.14:07:09 [\x1b[37mI\x1b[0m] {:<120} [server/main.go:42]\n",
            "server started"
        );
        assert_eq!(render(&record), expected);
    }

    #[test]
    fn test_missing_caller_renders_empty_location() {
        let line = render(&LogRecord::new(Level::Warn, "no caller"));
        assert!(line.ends_with(" [:0]\n"), "{line}");
    }

    #[test]
    fn test_short_message_padded_to_width() {
        let line = render(&LogRecord::new(Level::Debug, "abc"));
        let start = line.find("] ").unwrap() + 2;
        let end = line.rfind(" [").unwrap();
        let column = &line[start..end];

        assert_eq!(column.chars().count(), MESSAGE_WIDTH);
        assert!(column.starts_with("abc "));
        assert!(column[3..].chars().all(|c| c == ' '));
    }

    #[test]
    fn test_long_message_not_truncated() {
        let message = "m".repeat(MESSAGE_WIDTH + 30);
        let line = render(&LogRecord::new(Level::Error, &message));
        assert!(line.contains(&format!("] {} [:0]\n", message)));
    }

    #[test]
    fn test_exact_width_message_has_no_padding() {
        let message = "w".repeat(MESSAGE_WIDTH);
        let line = render(&LogRecord::new(Level::Info, &message));
        assert!(line.contains(&format!("] {} [:0]\n", message)));
    }

    #[test]
    fn test_level_tags_are_single_uppercase_letters() {
        let formatter = formatter();
        let scheme = formatter.colors();

        for level in [
            Level::Trace,
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
            Level::Fatal,
            Level::Panic,
        ] {
            let expected_letter = level.as_str()[..1].to_uppercase();
            let tag = formatter.level_tag(level);
            assert_eq!(tag, scheme.level_color(level).apply(&expected_letter));
        }
    }

    #[test]
    fn test_trace_uses_debug_color() {
        let formatter = formatter();
        assert_eq!(formatter.level_tag(Level::Trace), "\x1b[34mT\x1b[0m");
    }

    #[test]
    fn test_configured_scheme_overrides_level_color() {
        colored::control::set_override(true);
        let scheme = ColorScheme::default();
        let formatter = LineFormatter::new(&scheme, "/app/bin");

        // An empty scheme falls back to the default scheme: info is green.
        assert_eq!(formatter.level_tag(Level::Info), "\x1b[32mI\x1b[0m");
    }

    #[test]
    fn test_formatting_is_pure() {
        let record = LogRecord::new(Level::Fatal, "boom").with_caller(Caller::new("/app/bin/a.rs", 7));
        let formatter = formatter();

        assert_eq!(
            formatter.format_at(&record, fixed_time()),
            formatter.format_at(&record, fixed_time())
        );
    }

    #[test]
    fn test_message_is_not_colored() {
        let line = render(&LogRecord::new(Level::Error, "plain text"));
        let tail = &line[line.find("] ").unwrap()..];
        assert!(!tail.contains('\x1b'), "{tail:?}");
    }
}
