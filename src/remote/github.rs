//! GitHub contents API client
//!
//! One `reqwest::Client` per process; every call carries the bearer token and
//! asks for the v3 JSON representation.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Response, Url};

use super::traits::{ContentStore, RemoteResult};
use super::types::{
	CommitRecord, DocumentPath, FileHandle, RemoteErrorBody, UpdateRequest, UpdateResponse,
};
use crate::config::{Config, Credential};
use crate::error::RemoteError;
use crate::logging::*;

/// Accept header selecting the structured file-metadata format
pub const GITHUB_JSON: &str = "application/vnd.github.v3+json";

pub struct GitHubStore {
	client: reqwest::Client,
	api_base: Url,
	owner: String,
	repo: String,
	token: Option<Credential>,
}

impl GitHubStore {
	pub fn new(config: &Config) -> Result<Self, RemoteError> {
		let api_base = Url::parse(&config.api_base)
			.map_err(|e| RemoteError::Transport(format!("invalid API base: {}", e)))?;
		if api_base.cannot_be_a_base() {
			return Err(RemoteError::Transport(format!(
				"API base cannot carry a path: {}",
				config.api_base
			)));
		}
		let client = reqwest::Client::builder().user_agent(config.user_agent.as_str()).build()?;
		Ok(GitHubStore {
			client,
			api_base,
			owner: config.owner.clone(),
			repo: config.repo.clone(),
			token: config.token.clone(),
		})
	}

	/// `<apiBase>/repos/<owner>/<repo>/contents/<path>`, each segment percent-encoded
	pub fn file_url(&self, path: &DocumentPath) -> RemoteResult<Url> {
		let mut url = self.api_base.clone();
		url.path_segments_mut()
			.map_err(|_| RemoteError::Transport("API base cannot carry a path".to_string()))?
			.pop_if_empty()
			.extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
			.extend(path.segments());
		Ok(url)
	}

	fn token(&self) -> RemoteResult<&str> {
		self.token.as_ref().map(Credential::expose).ok_or(RemoteError::MissingCredential)
	}
}

/// Turn a non-success response into `RemoteError::Status`
///
/// The remote message is kept verbatim; a body that is not a JSON error
/// object yields no message.
async fn rejection(response: Response) -> RemoteError {
	let status = response.status().as_u16();
	let body = response.text().await.unwrap_or_default();
	let parsed: RemoteErrorBody = serde_json::from_str(&body).unwrap_or_default();
	if parsed.message.is_none() && !body.is_empty() {
		debug!("HTTP {} with unstructured body: {}", status, body);
	}
	RemoteError::Status { status, message: parsed.message }
}

#[async_trait]
impl ContentStore for GitHubStore {
	async fn get_file(&self, path: &DocumentPath) -> RemoteResult<FileHandle> {
		let url = self.file_url(path)?;
		debug!("GET {}", url);
		let response =
			self.client.get(url).bearer_auth(self.token()?).header(ACCEPT, GITHUB_JSON).send().await?;
		if !response.status().is_success() {
			return Err(rejection(response).await);
		}
		Ok(response.json::<FileHandle>().await?)
	}

	async fn put_file(
		&self,
		path: &DocumentPath,
		request: &UpdateRequest,
	) -> RemoteResult<CommitRecord> {
		let url = self.file_url(path)?;
		debug!("PUT {} (sha: {:?}, branch: {})", url, request.sha, request.branch);
		let response = self
			.client
			.put(url)
			.bearer_auth(self.token()?)
			.header(ACCEPT, GITHUB_JSON)
			.json(request)
			.send()
			.await?;
		if !response.status().is_success() {
			return Err(rejection(response).await);
		}
		let body: UpdateResponse = response.json().await?;
		Ok(CommitRecord(body.commit))
	}
}


// vim: ts=4
