//! Tracing subscriber initialization.
//!
//! One-shot setup for the embedding process. Filtering follows
//! `RUST_LOG` with an `info`-level default for the `halcyon` crates.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Reads `RUST_LOG` for filtering, defaulting to `info` for HALCYON
/// crates and `warn` elsewhere. Safe to call once per process; later
/// calls are ignored if a subscriber is already installed.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,halcyon=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
