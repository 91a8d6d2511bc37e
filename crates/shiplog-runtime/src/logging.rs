//! Structured logging setup.
//!
//! Library crates only emit `tracing` events under `shiplog.*` targets.
//! Hosts that already install a subscriber should not call [`init`].

use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

/// Default directive when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "shiplog=info";

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `default_filter`
pub fn init(default_filter: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|err| Error::Config(format!("logging already initialized: {}", err)))
}
