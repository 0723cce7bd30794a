//! Structured logging setup.
//!
//! Console output is always on; a daily-rotated file is added unless
//! `LOG_DIR=off`. Every line of a run can be correlated through its run id.
//!
//! Environment variables:
//! - LOG_FORMAT=pretty|json (default: pretty)
//! - LOG_DIR=/path/to/logs or `off` (default: ./logs)
//! - RUN_ID=<uuid> (default: auto-generated)
//! - RUST_LOG=level (default: info)

use std::io;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;

const LOG_FILE_NAME: &str = "league_fixtures.log";
const DEFAULT_FILTER: &str = "info,league_fixtures=info";

/// Logging format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(&std::env::var("LOG_FORMAT").unwrap_or_default())
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// None disables the file layer
    pub log_dir: Option<PathBuf>,
    pub run_id: Uuid,
    pub filter: String,
}

impl LogConfig {
    pub fn from_env() -> Self {
        let log_dir = match std::env::var("LOG_DIR") {
            Ok(dir) if dir.eq_ignore_ascii_case("off") => None,
            Ok(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir)),
            _ => Some(PathBuf::from("./logs")),
        };
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());

        Self {
            format: LogFormat::from_env(),
            log_dir,
            run_id: get_run_id(),
            filter,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Formatting layer for the chosen format, boxed so both formats share a type
fn format_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .with_target(!ansi)
            .with_line_number(!ansi)
            .with_ansi(ansi)
            .compact()
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_line_number(true)
            .with_ansi(false)
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
    }
}

/// Initialize logging from the environment.
///
/// Returns the file writer's guard when file logging is enabled; keep it alive
/// for the program lifetime so buffered lines are flushed on exit.
pub fn init_logging() -> Option<WorkerGuard> {
    let config = LogConfig::from_env();

    let console = format_layer(config.format, io::stderr, true).with_filter(config.env_filter());

    let mut guard = None;
    let file = config.log_dir.as_ref().and_then(|dir| {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Failed to create log directory {}: {}", dir.display(), e);
            return None;
        }
        let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        guard = Some(file_guard);
        Some(format_layer(config.format, writer, false).with_filter(config.env_filter()))
    });

    tracing_subscriber::registry().with(console).with(file).init();

    tracing::info!(
        run_id = %config.run_id,
        log_format = ?config.format,
        log_dir = ?config.log_dir,
        filter = %config.filter,
        "Logging initialized"
    );

    guard
}

/// Get the current run ID from environment or generate a new one.
pub fn get_run_id() -> Uuid {
    std::env::var("RUN_ID")
        .ok()
        .and_then(|s| Uuid::parse_str(&s).ok())
        .unwrap_or_else(Uuid::new_v4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(""), LogFormat::Pretty);
    }

    #[test]
    fn test_log_config_from_env() {
        std::env::remove_var("LOG_DIR");
        std::env::remove_var("RUST_LOG");

        let config = LogConfig::from_env();
        assert_eq!(config.log_dir, Some(PathBuf::from("./logs")));
        assert_eq!(config.filter, DEFAULT_FILTER);

        std::env::set_var("LOG_DIR", "off");
        assert_eq!(LogConfig::from_env().log_dir, None);

        std::env::set_var("LOG_DIR", "/tmp/fixture_logs");
        assert_eq!(
            LogConfig::from_env().log_dir,
            Some(PathBuf::from("/tmp/fixture_logs"))
        );

        std::env::remove_var("LOG_DIR");
    }

    #[test]
    fn test_get_run_id() {
        std::env::remove_var("RUN_ID");
        assert_ne!(get_run_id(), get_run_id());

        let run_id = Uuid::new_v4();
        std::env::set_var("RUN_ID", run_id.to_string());
        assert_eq!(get_run_id(), run_id);

        std::env::remove_var("RUN_ID");
    }
}
