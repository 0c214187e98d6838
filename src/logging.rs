use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "cat_finder.log";
const DEFAULT_FILTER: &str = "cat_finder=info,warn";

/// Install the global subscriber: readable lines on stdout and JSON lines in
/// a daily-rotated file under `logs/`. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    // File logging is best effort; console output still works without it
    let _ = fs::create_dir_all(LOG_DIR);

    let (json_writer, flush_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(LOG_DIR, LOG_FILE_PREFIX));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(json_writer))
        .with(fmt::layer().with_target(true).with_writer(std::io::stdout))
        .init();

    // The writer thread flushes when the guard drops; it must outlive main
    std::mem::forget(flush_guard);
}
