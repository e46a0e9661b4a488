//! HTTP surface of the proxy
//!
//! `GET /api/sync` reads, `POST /api/sync` writes, anything else on that
//! route is 405. The credential guard runs before dispatch so a missing
//! token yields 500 without touching the remote.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::error::Error;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{ErrorBody, ProxyError, MSG_METHOD_NOT_ALLOWED, MSG_NO_CONTENT};
use crate::logging::*;
use crate::proxy::{SyncService, WriteReceipt};
use crate::remote::{ContentStore, GitHubStore};

/// Route served by the proxy
pub const SYNC_ROUTE: &str = "/api/sync";

#[derive(Clone)]
pub struct AppState {
	service: Arc<SyncService>,
}

impl AppState {
	pub fn new(store: Arc<dyn ContentStore>, config: Arc<Config>) -> Self {
		AppState { service: Arc::new(SyncService::new(store, config)) }
	}
}

#[derive(Debug, Deserialize)]
struct ReadQuery {
	path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WriteBody {
	path: Option<String>,
	content: Option<Value>,
}

pub fn router(state: AppState) -> Router {
	let sync = get(read_document)
		.post(write_document)
		.fallback(method_not_allowed)
		.layer(middleware::from_fn_with_state(state.clone(), require_credential));

	Router::new()
		.route(SYNC_ROUTE, sync)
		.route("/healthz", get(health))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

async fn require_credential(State(state): State<AppState>, request: Request, next: Next) -> Response {
	if !state.service.config().has_credential() {
		return ProxyError::ConfigurationMissing.into_response();
	}
	next.run(request).await
}

async fn read_document(
	State(state): State<AppState>,
	query: Result<Query<ReadQuery>, QueryRejection>,
) -> Result<Json<Value>, ProxyError> {
	let Query(query) = query.map_err(|e| ProxyError::BadRequest(e.body_text()))?;
	let document = state.service.read(query.path.as_deref()).await?;
	Ok(Json(document))
}

async fn write_document(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<WriteReceipt>, ProxyError> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Err(ProxyError::BadRequest(MSG_NO_CONTENT.to_string()));
	}
	let body: WriteBody = serde_json::from_slice(&body).map_err(|e| {
		ProxyError::BadRequest(format!("El cuerpo de la petición no es JSON válido: {}", e))
	})?;
	let receipt = state.service.write(body.path.as_deref(), body.content).await?;
	Ok(Json(receipt))
}

async fn method_not_allowed() -> Response {
	warn!("Rejected request with unsupported method");
	(StatusCode::METHOD_NOT_ALLOWED, Json(ErrorBody::plain(Some(MSG_METHOD_NOT_ALLOWED.into()))))
		.into_response()
}

async fn health() -> Json<Value> {
	Json(json!({ "status": "ok" }))
}

/// Bind `config.listen` and serve until Ctrl-C
pub async fn serve(config: Config) -> Result<(), Box<dyn Error>> {
	let addr = config.listen_addr()?;
	if !config.has_credential() {
		warn!("GITHUB_TOKEN is not set; every sync request will fail with 500");
	}

	let store = GitHubStore::new(&config)?;
	let config = Arc::new(config);
	let app = router(AppState::new(Arc::new(store), config.clone()));

	let listener = tokio::net::TcpListener::bind(addr).await?;
	info!(
		"Proxying {}/{}@{} on http://{}{}",
		config.owner,
		config.repo,
		config.branch,
		listener.local_addr()?,
		SYNC_ROUTE
	);
	axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
	info!("Server stopped");
	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		error!("Cannot listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
}


// vim: ts=4
