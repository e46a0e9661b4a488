//! The remote file API seam
//!
//! The proxy logic depends only on this trait, so the transaction can be
//! exercised against an in-memory store and the GitHub client stays a thin
//! adapter.

use async_trait::async_trait;

use super::types::{CommitRecord, DocumentPath, FileHandle, UpdateRequest};
use crate::error::RemoteError;

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;

#[async_trait]
pub trait ContentStore: Send + Sync {
	/// Fetch the current handle of `path`
	///
	/// A missing file is `RemoteError::Status { status: 404, .. }`.
	async fn get_file(&self, path: &DocumentPath) -> RemoteResult<FileHandle>;

	/// Create or replace `path`
	///
	/// The remote checks `request.sha` against the current version and refuses
	/// the write on mismatch.
	async fn put_file(
		&self,
		path: &DocumentPath,
		request: &UpdateRequest,
	) -> RemoteResult<CommitRecord>;
}

// vim: ts=4
