//! Document content codec
//!
//! The contents API carries file bodies as standard base64, wrapped at 60
//! columns on the way out. Documents are written as pretty-printed JSON with
//! two-space indentation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use std::fmt;

#[derive(Debug)]
pub enum CodecError {
	Base64(base64::DecodeError),
	Utf8(std::string::FromUtf8Error),
	Json(serde_json::Error),
}

impl fmt::Display for CodecError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CodecError::Base64(e) => write!(f, "Base64 decode error: {}", e),
			CodecError::Utf8(e) => write!(f, "Content is not UTF-8: {}", e),
			CodecError::Json(e) => write!(f, "Content is not JSON: {}", e),
		}
	}
}

impl std::error::Error for CodecError {}

impl From<base64::DecodeError> for CodecError {
	fn from(e: base64::DecodeError) -> Self {
		CodecError::Base64(e)
	}
}

impl From<std::string::FromUtf8Error> for CodecError {
	fn from(e: std::string::FromUtf8Error) -> Self {
		CodecError::Utf8(e)
	}
}

impl From<serde_json::Error> for CodecError {
	fn from(e: serde_json::Error) -> Self {
		CodecError::Json(e)
	}
}

/// Decode a remote `content` field into the JSON document it holds
pub fn decode_document(content: &str) -> Result<Value, CodecError> {
	let compact: Vec<u8> = content.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
	let bytes = STANDARD.decode(compact)?;
	let text = String::from_utf8(bytes)?;
	Ok(serde_json::from_str(&text)?)
}

/// Pretty-print a document and base64-encode it for an update call
pub fn encode_document(document: &Value) -> Result<String, CodecError> {
	let text = serde_json::to_string_pretty(document)?;
	Ok(STANDARD.encode(text))
}


// vim: ts=4
