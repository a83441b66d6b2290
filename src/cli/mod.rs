//! Command-line front end
//!
//! Contains the command definitions and the logic that runs them against a
//! [`HumbleApi`](crate::HumbleApi). The binary only parses arguments, loads
//! configuration and prints what these functions return.

pub mod commands;

pub use commands::{Command, WebpackPage, run_command};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins; otherwise `debug` when verbose, else `level`.
pub fn init_logging(level: &str, verbose: bool) {
    let fallback = if verbose { "debug" } else { level };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
