//! Remote file API
//!
//! The proxy talks to the repository through the [`ContentStore`] trait.
//! [`GitHubStore`] is the production implementation.
//!
//! # Example Usage
//!
//! ```ignore
//! use syncproxy::remote::{ContentStore, DocumentPath, GitHubStore};
//!
//! let store = GitHubStore::new(&config)?;
//! let handle = store.get_file(&DocumentPath::parse("data/catálogo.json")?).await?;
//! println!("current version: {}", handle.sha);
//! ```

pub mod github;
pub mod traits;
pub mod types;

// Re-export public API
pub use github::{GitHubStore, GITHUB_JSON};
pub use traits::{ContentStore, RemoteResult};
pub use types::{CommitRecord, DocumentPath, FileHandle, UpdateRequest};

// vim: ts=4
