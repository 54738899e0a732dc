//! Diagnostics for folder sessions
//!
//! Sessions and the tree builder emit `tracing` events with structured
//! fields (`id`, `parent`, `path`, `count`). [`init`] installs a subscriber
//! that writes them to stderr, leaving stdout to the caller.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{Error, Result};

/// Filter used when `RUST_LOG` is not set: session actions, but only
/// warnings from hierarchy builds.
pub const DEFAULT_FILTER: &str = "vfs_core=info,vfs_tree=warn";

/// Install the global subscriber with [`DEFAULT_FILTER`].
///
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<()> {
    init_with_filter(DEFAULT_FILTER)
}

/// Install the global subscriber, falling back to `directives` when
/// `RUST_LOG` is unset or unparsable.
pub fn init_with_filter(directives: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(directives)?,
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::Logging {
            message: e.to_string(),
        })
}

fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| Error::Logging {
        message: format!("invalid filter {directives:?}: {e}"),
    })
}
