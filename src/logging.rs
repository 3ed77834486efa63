use crate::error::{ReadmeError, Result};
use env_logger::{Builder, Env};
use log::{self, LevelFilter};
use chrono::Local;
use std::io::Write;
use tracing_subscriber::EnvFilter;
use yansi::Paint;

/// Initializes terminal logging for the CLI with the specified default level
///
/// `RUST_LOG` still wins when set. Valid levels are: error, warn, info, debug, trace;
/// anything else falls back to info.
pub fn init(log_level: &str) -> Result<()> {
    let env = Env::default().write_style_or("RUST_LOG_STYLE", "always");

    Builder::new()
        .filter_level(parse_log_level(log_level))
        .parse_env(env)
        .format(|buf, record| {
            writeln!(buf, "{}", format_log(record))
        })
        .try_init()
        .map_err(|e| ReadmeError::Config(format!("Failed to initialize logger: {}", e)))
}

/// Initializes the `tracing` subscriber used by the HTTP server
///
/// `log` records emitted by the library are forwarded into the subscriber.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| ReadmeError::Config(format!("Failed to initialize tracing: {}", e)))
}

/// Formats a log record into a structured string
///
/// Returns a formatted string with timestamp, level, and message
pub fn format_log(record: &log::Record) -> String {
    let level = match record.level() {
        log::Level::Error => Paint::red("ERROR").bold(),
        log::Level::Warn => Paint::yellow("WARN ").bold(),
        log::Level::Info => Paint::cyan("INFO ").bold(),
        log::Level::Debug => Paint::blue("DEBUG").bold(),
        log::Level::Trace => Paint::new("TRACE"),
    };

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let target = if !record.target().is_empty() {
        record.target()
    } else {
        record.module_path().unwrap_or("unknown")
    };

    format!(
        "[{}] {} [{}] {}",
        timestamp,
        level,
        target,
        record.args()
    )
}

/// Parses a log level string into a LevelFilter
///
/// Returns the corresponding LevelFilter, defaulting to Info for invalid strings
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}
