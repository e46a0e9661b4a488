//! Logging prelude for the proxy.
//!
//! Re-exports the tracing macros used across the crate so modules only need
//! `use crate::logging::*;`.

pub use tracing::{debug, error, info, warn};

/// Initialize the tracing subscriber.
///
/// Logs at INFO and above unless `RUST_LOG` says otherwise:
///
/// ```bash
/// RUST_LOG=debug syncproxy serve
/// RUST_LOG=syncproxy::remote=trace,tower_http=debug syncproxy serve
/// ```
///
/// Output goes to stderr so stdout stays free for the `config` subcommand.
pub fn init_tracing() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info")),
		)
		.with_writer(std::io::stderr)
		.init();
}

// vim: ts=4
