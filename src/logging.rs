//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set, e.g. `RUST_LOG=beedash=trace`. Otherwise the level is
//! `info`, or `debug` in debug mode.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(debug)
        .init();
}
