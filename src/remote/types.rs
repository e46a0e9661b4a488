//! Wire types of the contents API
//!
//! Field names follow the remote JSON exactly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Validated document path inside the repository
///
/// Leading slashes are dropped. Empty, `.` and `..` segments are refused so a
/// caller cannot step outside the contents endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath(String);

impl DocumentPath {
	pub fn parse(raw: &str) -> Result<DocumentPath, String> {
		let trimmed = raw.trim().trim_start_matches('/');
		if trimmed.is_empty() {
			return Err("La ruta está vacía".to_string());
		}
		for segment in trimmed.split('/') {
			if segment.is_empty() || segment == "." || segment == ".." {
				return Err(format!("Ruta no válida: {}", raw));
			}
		}
		Ok(DocumentPath(trimmed.to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.0.split('/')
	}
}

impl fmt::Display for DocumentPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Remote file handle returned by GET
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileHandle {
	/// Content-hash token of the current version
	pub sha: String,

	/// Base64 body, possibly wrapped with line breaks
	#[serde(default)]
	pub content: String,
}

/// Body of the create-or-replace PUT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
	pub message: String,
	pub content: String,
	/// `null` creates the file, a token replaces that exact version
	pub sha: Option<String>,
	pub branch: String,
}

/// Successful PUT response; only `commit` is kept
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateResponse {
	#[serde(default)]
	pub commit: Value,
}

/// Error object the remote sends with non-success statuses
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RemoteErrorBody {
	#[serde(default)]
	pub message: Option<String>,
}

/// Commit metadata, passed through to the caller untouched
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CommitRecord(pub Value);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_path_strips_leading_slash() {
		let path = DocumentPath::parse("/data/catálogo.json").unwrap();
		assert_eq!(path.as_str(), "data/catálogo.json");
		assert_eq!(path.segments().collect::<Vec<_>>(), vec!["data", "catálogo.json"]);
	}

	#[test]
	fn test_path_rejects_traversal_and_empty_segments() {
		assert!(DocumentPath::parse("").is_err());
		assert!(DocumentPath::parse("   ").is_err());
		assert!(DocumentPath::parse("data/../secrets.json").is_err());
		assert!(DocumentPath::parse("data//x.json").is_err());
		assert!(DocumentPath::parse("data/./x.json").is_err());
		assert!(DocumentPath::parse("data/").is_err());
	}

	#[test]
	fn test_update_request_sends_null_sha() {
		let req = UpdateRequest {
			message: "m".into(),
			content: "e30=".into(),
			sha: None,
			branch: "main".into(),
		};
		let json = serde_json::to_value(&req).unwrap();
		assert!(json.get("sha").unwrap().is_null());
	}

	#[test]
	fn test_file_handle_without_content() {
		let handle: FileHandle = serde_json::from_str(r#"{"sha": "abc", "type": "file"}"#).unwrap();
		assert_eq!(handle.sha, "abc");
		assert!(handle.content.is_empty());
	}
}

// vim: ts=4
