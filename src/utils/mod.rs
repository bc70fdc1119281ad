//! Logging setup.
//!
//!   derive_level(verbose, quiet) -> LevelFilter
//!   init_logging(level)
//!
//! Logs go to stderr so stdout only ever carries the rendered payload.
//! `RUST_LOG`, when set, overrides the level derived from the flags.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
