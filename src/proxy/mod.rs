//! Read and write operations of the sync proxy
//!
//! `SyncService` is stateless apart from its configuration and the store it
//! talks to. Each call resolves the document against the remote's current
//! state; nothing is cached between requests.

mod read;
mod write;

pub use write::{commit_message, Precondition, WriteReceipt, MSG_UPDATED};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ProxyError, Stage};
use crate::remote::{ContentStore, DocumentPath, RemoteResult};

pub struct SyncService {
	store: Arc<dyn ContentStore>,
	config: Arc<Config>,
}

impl SyncService {
	pub fn new(store: Arc<dyn ContentStore>, config: Arc<Config>) -> Self {
		SyncService { store, config }
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Requested path, or `default` when absent or empty
	fn resolve_path(&self, requested: Option<&str>, default: &str) -> Result<DocumentPath, ProxyError> {
		let raw = match requested {
			Some(p) if !p.is_empty() => p,
			_ => default,
		};
		DocumentPath::parse(raw).map_err(ProxyError::BadRequest)
	}
}

/// Run one outbound call, cancelling it when `budget` elapses
///
/// Dropping the timed-out future aborts the in-flight request. The remote's
/// own answer is handed back untouched.
async fn within<T, F>(
	stage: Stage,
	budget: Option<Duration>,
	call: F,
) -> Result<RemoteResult<T>, ProxyError>
where
	F: Future<Output = RemoteResult<T>>,
{
	match budget {
		Some(after) => tokio::time::timeout(after, call)
			.await
			.map_err(|_| ProxyError::UpstreamTimeout { stage, after }),
		None => Ok(call.await),
	}
}

/// [`within`], with a remote failure mapped for the caller
async fn bounded<T, F>(stage: Stage, budget: Option<Duration>, call: F) -> Result<T, ProxyError>
where
	F: Future<Output = RemoteResult<T>>,
{
	within(stage, budget, call).await?.map_err(|e| ProxyError::from_remote(stage, e))
}


// vim: ts=4
