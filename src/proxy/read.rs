use serde_json::Value;

use super::{bounded, SyncService};
use crate::codec::decode_document;
use crate::error::{ProxyError, Stage};
use crate::logging::*;

impl SyncService {
	/// Fetch and decode the document stored at `path`
	///
	/// Bounded by `readTimeoutSecs`. Remote rejections keep their status and
	/// message; undecodable content is an internal failure.
	pub async fn read(&self, path: Option<&str>) -> Result<Value, ProxyError> {
		let path = self.resolve_path(path, &self.config.default_read_path)?;
		let budget = self.config.read_timeout();

		let handle = bounded(Stage::Fetch, Some(budget), self.store.get_file(&path)).await?;
		let document = decode_document(&handle.content)
			.map_err(|e| ProxyError::DecodeFailure(format!("{} (sha {}): {}", path, handle.sha, e)))?;

		info!("Read {} (sha {})", path, handle.sha);
		Ok(document)
	}
}

#[cfg(test)]
mod tests {
	use super::super::testing::{Call, ScriptedStore};
	use super::*;
	use crate::config::Config;
	use crate::error::RemoteError;
	use crate::remote::{CommitRecord, FileHandle};
	use base64::engine::general_purpose::STANDARD;
	use base64::Engine;
	use serde_json::json;
	use std::sync::Arc;
	use std::time::Duration;

	fn handle(text: &str) -> FileHandle {
		FileHandle { sha: "abc123".into(), content: STANDARD.encode(text) }
	}

	fn service(store: Arc<ScriptedStore>) -> SyncService {
		SyncService::new(store, Arc::new(Config::default()))
	}

	#[tokio::test]
	async fn test_read_decodes_document() {
		let store = Arc::new(ScriptedStore::new(
			Ok(handle(r#"{"monedas": [1, 2]}"#)),
			Ok(CommitRecord(json!(null))),
		));
		let doc = service(store.clone()).read(Some("data/otro.json")).await.unwrap();
		assert_eq!(doc, json!({"monedas": [1, 2]}));
		assert_eq!(store.calls(), vec![Call::Get("data/otro.json".into())]);
	}

	#[tokio::test]
	async fn test_read_uses_default_path() {
		for requested in [None, Some("")] {
			let store =
				Arc::new(ScriptedStore::new(Ok(handle("[]")), Ok(CommitRecord(json!(null)))));
			service(store.clone()).read(requested).await.unwrap();
			assert_eq!(store.calls(), vec![Call::Get("data/catálogo.json".into())]);
		}
	}

	#[tokio::test]
	async fn test_read_passes_rejection_through() {
		let store = Arc::new(ScriptedStore::new(
			Err(RemoteError::Status { status: 403, message: Some("Bad credentials".into()) }),
			Ok(CommitRecord(json!(null))),
		));
		let err = service(store).read(None).await.unwrap_err();
		assert!(matches!(
			err,
			ProxyError::UpstreamRejected { stage: Stage::Fetch, status: 403, message: Some(ref m) }
				if m == "Bad credentials"
		));
	}

	#[tokio::test]
	async fn test_read_reports_decode_failure() {
		let store =
			Arc::new(ScriptedStore::new(Ok(handle("{not json")), Ok(CommitRecord(json!(null)))));
		let err = service(store).read(None).await.unwrap_err();
		assert!(matches!(err, ProxyError::DecodeFailure(_)));
	}

	#[tokio::test]
	async fn test_read_rejects_traversal_without_calling_remote() {
		let store = Arc::new(ScriptedStore::new(Ok(handle("[]")), Ok(CommitRecord(json!(null)))));
		let err = service(store.clone()).read(Some("../x.json")).await.unwrap_err();
		assert!(matches!(err, ProxyError::BadRequest(_)));
		assert!(store.calls().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn test_read_times_out_after_ten_seconds() {
		let mut store = ScriptedStore::new(Ok(handle("[]")), Ok(CommitRecord(json!(null))));
		store.get_delay = Some(Duration::from_secs(30));
		let started = tokio::time::Instant::now();

		let err = service(Arc::new(store)).read(None).await.unwrap_err();

		assert!(matches!(
			err,
			ProxyError::UpstreamTimeout { stage: Stage::Fetch, after } if after == Duration::from_secs(10)
		));
		assert!(started.elapsed() >= Duration::from_secs(10));
		assert!(started.elapsed() < Duration::from_secs(30));
	}
}

// vim: ts=4
