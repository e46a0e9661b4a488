//! # SyncProxy - credential-holding proxy for a JSON document on GitHub
//!
//! A browser client reads and writes one JSON document kept in a GitHub
//! repository through this proxy, which holds the access token server-side.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use syncproxy::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     syncproxy::logging::init_tracing();
//!     let config = Config::load(None)?;
//!     server::serve(config).await
//! }
//! ```
//!
//! ## Using the service directly
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use syncproxy::{proxy::SyncService, remote::GitHubStore};
//!
//! let store = Arc::new(GitHubStore::new(&config)?);
//! let service = SyncService::new(store, Arc::new(config));
//! let doc = service.read(Some("data/catálogo.json")).await?;
//! let receipt = service.write(None, Some(doc)).await?;
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod remote;
pub mod server;

// Re-export commonly used types and functions
pub use config::{Config, ConfigError, Credential};
pub use error::{ProxyError, RemoteError, Stage};
pub use proxy::{Precondition, SyncService, WriteReceipt};
pub use remote::{ContentStore, DocumentPath, GitHubStore};

// vim: ts=4
