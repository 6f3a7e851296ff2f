//! Tracing subscriber setup: console formatter, append-only file layer, and
//! initialisation.
use std::fmt::Write as _;
use std::fs;
use std::io::{IsTerminal as _, Write as _};
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "bootstrap::stage";
/// Target used for dry-run action messages.
pub(super) const DRY_RUN_TARGET: &str = "bootstrap::dry_run";

/// An event's message followed by any other fields as ` key=value`.
#[derive(Default)]
struct EventText {
    message: String,
    fields: String,
}

impl EventText {
    fn of(event: &tracing::Event<'_>) -> String {
        let mut text = Self::default();
        event.record(&mut text);
        text.message + &text.fields
    }
}

impl tracing::field::Visit for EventText {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            write!(self.fields, " {}={value}", field.name()).ok();
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            write!(self.fields, " {}={value:?}", field.name()).ok();
        }
    }
}

/// A [`tracing_subscriber::Layer`] appending every event to the persistent
/// log, one timestamped line each, without colour codes.
///
/// Each run starts with a separator line; earlier runs are kept.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the log file for `command`.
    ///
    /// Returns `None` if no log directory can be resolved or the file cannot
    /// be opened.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::open(&log_file_path(command)?)
    }

    /// Open `path` for appending, creating it and its parent if missing, and
    /// write the run separator.
    pub(super) fn open(path: &Path) -> Option<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()?;
        writeln!(
            file,
            "=== bootstrap {} run {} UTC ===",
            crate::cli::VERSION,
            format_utc_datetime(),
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

/// Render one log file line. Stage headers keep the `--- name ---` shape
/// they have on the console.
fn file_line(level: Level, target: &str, text: &str) -> String {
    let tag = match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO if target == DRY_RUN_TARGET => "DRY",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        _ => "TRACE",
    };
    if target == STAGE_TARGET {
        format!("{} {tag:<5} --- {text} ---", format_utc_time())
    } else {
        format!("{} {tag:<5} {text}", format_utc_time())
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let line = file_line(
            *metadata.level(),
            metadata.target(),
            &strip_ansi(&EventText::of(event)),
        );

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console formatter: `--- Stage ---` headers, indented progress lines and
/// `warning:`/`error:` prefixes. Colour only when the writer supports it.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let ansi = writer.has_ansi_escapes();
        let paint = |sgr: &str, s: &str| {
            if ansi {
                format!("\x1b[{sgr}m{s}\x1b[0m")
            } else {
                s.to_owned()
            }
        };

        let raw = EventText::of(event);
        let text = if ansi { raw } else { strip_ansi(&raw) };

        let metadata = event.metadata();
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => writeln!(writer, "{} {text}", paint("1;31", "error:")),
            (Level::WARN, _) => writeln!(writer, "{} {text}", paint("1;33", "warning:")),
            (Level::INFO, STAGE_TARGET) => {
                writeln!(writer, "\n{}", paint("1", &format!("--- {text} ---")))
            }
            (Level::INFO, DRY_RUN_TARGET) => {
                writeln!(writer, "  {} {text}", paint("33", "[dry run]"))
            }
            (Level::INFO, _) => writeln!(writer, "  {text}"),
            _ => writeln!(writer, "  {}", paint("2", &text)),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout. `DEBUG`
/// reaches the console only when `verbose` is set, and colour only when
/// stdout is a terminal. The file layer always records `DEBUG` and above to
/// `$XDG_CACHE_HOME/bootstrap/<command>.log`; without a usable log directory
/// the console layer runs alone. Call once, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_ansi(std::io::stdout().is_terminal())
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
