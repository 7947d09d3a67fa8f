//! Log output for the `tax-estimator` binary.
//!
//! Logs go to stderr so that reports and batch CSV on stdout can be piped
//! without picking up log lines. An optional log file receives the same
//! records without colour.

use anyhow::{Context, Result};
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal},
    path::PathBuf,
    sync::Arc,
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "info";

/// Logging choices taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct LogOptions {
    /// Explicit filter directive; wins over `RUST_LOG`.
    pub level: Option<String>,
    /// File to append records to.
    pub file: Option<PathBuf>,
    /// Suppress terminal output. File logging is unaffected.
    pub quiet: bool,
}

// --- Formatter ---

const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

fn level_colour(level: Level) -> &'static str {
    match level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

/// `HH:MM:SS.mmm LEVEL [file:line] fields`, in local time.
///
/// Source locations are printed for this workspace's crates only; for
/// dependencies they are noise.
struct LocalFmt;

impl LocalFmt {
    fn paint(
        writer: &mut Writer<'_>,
        colour: &str,
        text: impl std::fmt::Display,
    ) -> std::fmt::Result {
        if writer.has_ansi_escapes() {
            write!(writer, "{colour}{text}{RESET}")
        } else {
            write!(writer, "{text}")
        }
    }
}

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        Self::paint(&mut writer, DIM, Local::now().format("%H:%M:%S%.3f"))?;
        writer.write_char(' ')?;
        Self::paint(
            &mut writer,
            level_colour(*meta.level()),
            format_args!("{:>5}", meta.level()),
        )?;
        writer.write_char(' ')?;

        if is_workspace_target(meta.target()) {
            if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
                Self::paint(&mut writer, CYAN, format_args!("{file}:{line}"))?;
                writer.write_char(' ')?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn is_workspace_target(target: &str) -> bool {
    target.starts_with("tax_")
}

// --- Setup ---

/// Picks the filter: the explicit directive, then `RUST_LOG`, then "info".
fn build_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log level '{directive}'")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Installs the global subscriber. Call once, before any work is done.
pub fn init_logging(options: &LogOptions) -> Result<()> {
    let filter = build_filter(options.level.as_deref())?;

    let stderr_layer = (!options.quiet).then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(LocalFmt)
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
    });

    let file_layer = match &options.file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(LocalFmt)
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging is already initialised")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ---------------------------------------------------------------
    // build_filter
    // ---------------------------------------------------------------

    #[test]
    fn explicit_level_is_used() {
        let filter = build_filter(Some("tax_core=debug")).unwrap();

        assert_eq!(filter.to_string(), "tax_core=debug");
    }

    #[test]
    fn invalid_level_is_rejected() {
        let err = build_filter(Some("tax_core=loud")).unwrap_err();

        assert!(err.to_string().contains("tax_core=loud"));
    }

    // ---------------------------------------------------------------
    // formatter helpers
    // ---------------------------------------------------------------

    #[test]
    fn only_workspace_targets_show_locations() {
        assert!(is_workspace_target("tax_core::calculations::medicare"));
        assert!(is_workspace_target("tax_cli"));
        assert!(!is_workspace_target("tower_http::trace"));
    }

    #[test]
    fn each_level_has_its_own_colour() {
        let colours = [
            Level::ERROR,
            Level::WARN,
            Level::INFO,
            Level::DEBUG,
            Level::TRACE,
        ]
        .map(level_colour);

        for (i, colour) in colours.iter().enumerate() {
            assert!(!colours[i + 1..].contains(colour));
        }
    }
}
