//! Error types for proxy operations

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::logging::*;

/// Body sent when the bearer credential is not configured
pub const MSG_TOKEN_MISSING: &str = "Token de GitHub no configurado";

/// Body sent for methods other than GET and POST
pub const MSG_METHOD_NOT_ALLOWED: &str = "Método no permitido";

/// Body sent when a write carries no `content`
pub const MSG_NO_CONTENT: &str = "No se proporcionó contenido";

/// Generic body for failures whose detail stays in the server log
pub const MSG_INTERNAL: &str = "Error interno del servidor";

/// Body sent when an outbound call exceeds its time budget
pub const MSG_TIMEOUT: &str = "Tiempo de espera agotado al contactar con GitHub";

/// Which outbound call an upstream failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	/// GET issued by the read operation
	Fetch,
	/// GET issued by the write operation to resolve the precondition
	Lookup,
	/// PUT issued by the write operation
	Update,
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Stage::Fetch => write!(f, "fetch"),
			Stage::Lookup => write!(f, "lookup"),
			Stage::Update => write!(f, "update"),
		}
	}
}

/// Failure reported by a [`ContentStore`](crate::remote::ContentStore)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
	/// Remote answered with a non-success status
	Status { status: u16, message: Option<String> },

	/// Request never produced a response (DNS, TLS, connection reset...)
	Transport(String),

	/// Remote answered 2xx but the body did not have the expected shape
	InvalidPayload(String),

	/// No bearer credential available to authenticate the call
	MissingCredential,
}

impl RemoteError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, RemoteError::Status { status: 404, .. })
	}
}

impl fmt::Display for RemoteError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RemoteError::Status { status, message } => match message {
				Some(m) => write!(f, "remote returned HTTP {}: {}", status, m),
				None => write!(f, "remote returned HTTP {}", status),
			},
			RemoteError::Transport(msg) => write!(f, "transport error: {}", msg),
			RemoteError::InvalidPayload(msg) => write!(f, "unexpected remote payload: {}", msg),
			RemoteError::MissingCredential => write!(f, "bearer credential not configured"),
		}
	}
}

impl Error for RemoteError {}

impl From<reqwest::Error> for RemoteError {
	fn from(e: reqwest::Error) -> Self {
		if e.is_decode() {
			RemoteError::InvalidPayload(e.to_string())
		} else {
			RemoteError::Transport(e.to_string())
		}
	}
}

/// Main error type for request handling
#[derive(Debug)]
pub enum ProxyError {
	/// Required credential absent from configuration
	ConfigurationMissing,

	/// Outbound call exceeded its time budget and was cancelled
	UpstreamTimeout { stage: Stage, after: Duration },

	/// Remote returned a non-success status
	UpstreamRejected { stage: Stage, status: u16, message: Option<String> },

	/// Caller sent an unusable request
	BadRequest(String),

	/// Stored content is not valid base64, UTF-8 or JSON
	DecodeFailure(String),

	/// Anything else
	Internal(String),
}

impl ProxyError {
	/// Attach the stage an outbound failure happened in
	pub fn from_remote(stage: Stage, err: RemoteError) -> Self {
		match err {
			RemoteError::Status { status, message } => {
				ProxyError::UpstreamRejected { stage, status, message }
			}
			RemoteError::MissingCredential => ProxyError::ConfigurationMissing,
			RemoteError::Transport(msg) => {
				ProxyError::Internal(format!("{} call failed: {}", stage, msg))
			}
			RemoteError::InvalidPayload(msg) => {
				ProxyError::Internal(format!("{} call returned bad payload: {}", stage, msg))
			}
		}
	}

	pub fn status_code(&self) -> StatusCode {
		match self {
			ProxyError::ConfigurationMissing => StatusCode::INTERNAL_SERVER_ERROR,
			ProxyError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
			ProxyError::UpstreamRejected { status, .. } => {
				StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
			}
			ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ProxyError::DecodeFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
			ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// JSON body returned to the caller
	///
	/// Remote messages pass through verbatim. Decode and internal failures
	/// only expose the generic message.
	pub fn body(&self) -> ErrorBody {
		match self {
			ProxyError::ConfigurationMissing => ErrorBody::plain(Some(MSG_TOKEN_MISSING.into())),
			ProxyError::UpstreamTimeout { .. } => ErrorBody::failed(Some(MSG_TIMEOUT.into())),
			ProxyError::UpstreamRejected { stage: Stage::Update, message, .. } => {
				ErrorBody::failed(message.clone())
			}
			ProxyError::UpstreamRejected { message, .. } => ErrorBody::plain(message.clone()),
			ProxyError::BadRequest(msg) => ErrorBody::plain(Some(msg.clone())),
			ProxyError::DecodeFailure(_) | ProxyError::Internal(_) => {
				ErrorBody::failed(Some(MSG_INTERNAL.into()))
			}
		}
	}
}

impl fmt::Display for ProxyError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ProxyError::ConfigurationMissing => write!(f, "GITHUB_TOKEN is not configured"),
			ProxyError::UpstreamTimeout { stage, after } => {
				write!(f, "{} call timed out after {:?}", stage, after)
			}
			ProxyError::UpstreamRejected { stage, status, message } => {
				write!(f, "{} call rejected with HTTP {}", stage, status)?;
				if let Some(m) = message {
					write!(f, ": {}", m)?;
				}
				Ok(())
			}
			ProxyError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
			ProxyError::DecodeFailure(msg) => write!(f, "Cannot decode stored document: {}", msg),
			ProxyError::Internal(msg) => write!(f, "{}", msg),
		}
	}
}

impl Error for ProxyError {}

/// Error response shape: `{ success?, error? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub success: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl ErrorBody {
	pub fn plain(error: Option<String>) -> Self {
		ErrorBody { success: None, error }
	}

	pub fn failed(error: Option<String>) -> Self {
		ErrorBody { success: Some(false), error }
	}
}

impl IntoResponse for ProxyError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		if status.is_server_error() {
			error!("{}", self);
		} else {
			warn!("{}", self);
		}
		(status, Json(self.body())).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rejected_update_keeps_remote_status_and_message() {
		let err = ProxyError::UpstreamRejected {
			stage: Stage::Update,
			status: 409,
			message: Some("sha does not match".into()),
		};
		assert_eq!(err.status_code(), StatusCode::CONFLICT);
		let body = serde_json::to_value(err.body()).unwrap();
		assert_eq!(body, serde_json::json!({"success": false, "error": "sha does not match"}));
	}

	#[test]
	fn test_rejected_fetch_without_message_has_empty_body() {
		let err = ProxyError::UpstreamRejected { stage: Stage::Fetch, status: 404, message: None };
		assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(serde_json::to_value(err.body()).unwrap(), serde_json::json!({}));
	}

	#[test]
	fn test_only_404_counts_as_not_found() {
		assert!(RemoteError::Status { status: 404, message: None }.is_not_found());
		assert!(!RemoteError::Status { status: 410, message: None }.is_not_found());
		assert!(!RemoteError::Transport("reset".into()).is_not_found());
	}

	#[test]
	fn test_decode_failure_hides_detail() {
		let err = ProxyError::DecodeFailure("invalid byte 0x80 at offset 3".into());
		assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		let body = err.body();
		assert_eq!(body.error.as_deref(), Some(MSG_INTERNAL));
		assert!(err.to_string().contains("0x80"));
	}

	#[test]
	fn test_timeout_maps_to_gateway_timeout() {
		let err =
			ProxyError::UpstreamTimeout { stage: Stage::Fetch, after: Duration::from_secs(10) };
		assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
	}

	#[test]
	fn test_invalid_remote_status_becomes_bad_gateway() {
		let err = ProxyError::UpstreamRejected { stage: Stage::Lookup, status: 42, message: None };
		assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
	}

	#[test]
	fn test_missing_credential_from_remote() {
		let err = ProxyError::from_remote(Stage::Fetch, RemoteError::MissingCredential);
		assert!(matches!(err, ProxyError::ConfigurationMissing));
		assert_eq!(err.body().error.as_deref(), Some(MSG_TOKEN_MISSING));
	}
}

// vim: ts=4
