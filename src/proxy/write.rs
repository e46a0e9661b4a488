//! Conditional create-or-replace of a document
//!
//! A write is a two-step transaction. The lookup resolves a [`Precondition`]
//! and the update carries it to the remote, which refuses the write if the
//! file changed in between. A refused update is reported and never retried.

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;

use super::{bounded, within, SyncService};
use crate::codec::encode_document;
use crate::error::{ProxyError, Stage, MSG_NO_CONTENT};
use crate::logging::*;
use crate::remote::{CommitRecord, DocumentPath, UpdateRequest};

/// Message returned with a successful write
pub const MSG_UPDATED: &str = "Archivo actualizado correctamente en GitHub";

/// Outcome of the lookup step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
	/// Path holds no file; the update creates it
	Create,
	/// Path holds the version identified by `sha`
	Replace { sha: String },
}

impl Precondition {
	/// Token sent with the update, `None` for a creation
	pub fn sha(&self) -> Option<&str> {
		match self {
			Precondition::Create => None,
			Precondition::Replace { sha } => Some(sha),
		}
	}
}

/// Successful write response: `{ success, message, commit }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteReceipt {
	pub success: bool,
	pub message: String,
	pub commit: CommitRecord,
}

/// `"<prefix> - d/m/yyyy, H:MM:SS"`, the hour unpadded as in es-ES
pub fn commit_message(prefix: &str, at: &DateTime<Local>) -> String {
	format!("{} - {}", prefix, at.format("%-d/%-m/%Y, %-H:%M:%S"))
}

impl SyncService {
	/// Store `content` at `path`, creating the file when it does not exist
	pub async fn write(
		&self,
		path: Option<&str>,
		content: Option<Value>,
	) -> Result<WriteReceipt, ProxyError> {
		let document = match content {
			Some(v) if !v.is_null() => v,
			_ => return Err(ProxyError::BadRequest(MSG_NO_CONTENT.to_string())),
		};
		let path = self.resolve_path(path, &self.config.default_write_path)?;

		let precondition = self.resolve_precondition(&path).await?;
		let encoded = encode_document(&document)
			.map_err(|e| ProxyError::Internal(format!("cannot encode document: {}", e)))?;
		let commit = self.commit_update(&path, &precondition, encoded).await?;

		Ok(WriteReceipt { success: true, message: MSG_UPDATED.to_string(), commit })
	}

	/// Lookup step: current token of `path`, or `Create` on 404
	///
	/// Any other failure aborts the write.
	pub async fn resolve_precondition(
		&self,
		path: &DocumentPath,
	) -> Result<Precondition, ProxyError> {
		match within(Stage::Lookup, self.config.write_timeout(), self.store.get_file(path)).await? {
			Ok(handle) => {
				debug!("{} exists at sha {}", path, handle.sha);
				Ok(Precondition::Replace { sha: handle.sha })
			}
			Err(e) if e.is_not_found() => {
				debug!("{} does not exist yet, creating", path);
				Ok(Precondition::Create)
			}
			Err(e) => Err(ProxyError::from_remote(Stage::Lookup, e)),
		}
	}

	/// Update step: PUT the encoded document guarded by `precondition`
	pub async fn commit_update(
		&self,
		path: &DocumentPath,
		precondition: &Precondition,
		encoded: String,
	) -> Result<CommitRecord, ProxyError> {
		let request = UpdateRequest {
			message: commit_message(&self.config.commit_message_prefix, &Local::now()),
			content: encoded,
			sha: precondition.sha().map(str::to_string),
			branch: self.config.branch.clone(),
		};
		let commit =
			bounded(Stage::Update, self.config.write_timeout(), self.store.put_file(path, &request))
				.await?;
		info!("Committed {} to {} ({:?})", path, request.branch, precondition);
		Ok(commit)
	}
}


// vim: ts=4
