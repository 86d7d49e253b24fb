//! Logging utilities for PushMyNotifs.
//!
//! Every crate logs through `tracing`. This module installs the subscriber
//! once at startup and provides the helper the lifecycle code uses for its
//! log-and-continue error paths.

use pushmynotifs_config::LoggingConfig;
use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` is honoured first; the level is added as a `pushmynotifs=<level>`
/// directive on top. Uses `try_init`, so a second call (or a subscriber set by
/// a test harness) is left in place.
pub fn init_with_level(level: Level) {
    let result = tracing_subscriber::registry()
        .with(stdout_layer())
        .with(filter_for(level))
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize logging from the `[logging]` configuration section.
///
/// When `directory` is set, log lines are additionally written to a daily
/// rolling file there. The returned guard flushes that writer on drop and
/// must be held for the lifetime of the process.
pub fn init_from_config(config: &LoggingConfig) -> Option<WorkerGuard> {
    let level = parse_level(&config.level);

    match config.directory.as_deref() {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "pushmynotifs.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let result = tracing_subscriber::registry()
                .with(stdout_layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .with(filter_for(level))
                .try_init();

            if result.is_ok() {
                info!(directory, "Logging initialized at level: {}", level);
            }
            Some(guard)
        }
        None => {
            init_with_level(level);
            None
        }
    }
}

/// Parses a level name, falling back to INFO for anything unrecognised.
pub fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

fn stdout_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
}

fn filter_for(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("pushmynotifs={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_accepts_names_and_falls_back() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }
}
