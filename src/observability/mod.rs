//! Logging setup for the command-line tool.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. Logs go to stderr so `dtsgen emit` output on stdout stays
//! clean.
//!
//! ```ignore
//! use dtsgen::observability::init_logging;
//!
//! fn main() {
//!     init_logging(1); // -v
//! }
//! ```

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count, used when `RUST_LOG` is not set.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global fmt subscriber. Later calls leave the first subscriber
/// in place and report nothing.
pub fn init_logging(verbosity: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = builder.try_init();
}
