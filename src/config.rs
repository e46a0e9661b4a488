//! Unified configuration for the proxy
//!
//! Everything the handlers need is carried by a single `Config` value that is
//! built once at start-up and shared read-only afterwards.
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (TOML, or JSON when the extension is `.json`)
//! 3. Environment variables (`GITHUB_TOKEN`, `SYNCPROXY_*` prefix)
//! 4. CLI flags (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the bearer credential
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Prefix for every other environment override
pub const ENV_PREFIX: &str = "SYNCPROXY_";

// ============================================================================
// CREDENTIAL
// ============================================================================

/// Bearer credential for the remote API. Never printed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
	pub fn new(token: impl Into<String>) -> Self {
		Credential(token.into())
	}

	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for Credential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Credential(***)")
	}
}

// ============================================================================
// MAIN CONFIGURATION STRUCT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	// ========================================================================
	// REMOTE REPOSITORY
	// ========================================================================
	/// Bearer credential (`GITHUB_TOKEN`). Required for every proxied call.
	#[serde(skip_serializing)]
	pub token: Option<Credential>,

	/// Repository owner
	pub owner: String,

	/// Repository name
	pub repo: String,

	/// Branch every commit targets
	pub branch: String,

	/// Base URL of the contents API
	pub api_base: String,

	/// User-Agent sent on outbound calls (GitHub rejects requests without one)
	pub user_agent: String,

	// ========================================================================
	// DOCUMENTS
	// ========================================================================
	/// Path read when GET carries no `path` query parameter
	pub default_read_path: String,

	/// Path written when POST carries no `path` field
	pub default_write_path: String,

	/// Text placed before the timestamp in commit messages
	pub commit_message_prefix: String,

	// ========================================================================
	// TIMEOUTS
	// ========================================================================
	/// Budget for the read operation's outbound call
	pub read_timeout_secs: u64,

	/// Budget for each outbound call of the write operation (0 = unbounded)
	pub write_timeout_secs: u64,

	// ========================================================================
	// SERVER
	// ========================================================================
	/// Address the HTTP server binds to
	pub listen: String,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			token: None,
			owner: "rubendml".to_string(),
			repo: "numismatica".to_string(),
			branch: "main".to_string(),
			api_base: "https://api.github.com".to_string(),
			user_agent: concat!("syncproxy/", env!("CARGO_PKG_VERSION")).to_string(),

			default_read_path: "data/catálogo.json".to_string(),
			default_write_path: "data/coleccion.json".to_string(),
			commit_message_prefix: "Sincronización automática".to_string(),

			read_timeout_secs: 10,
			write_timeout_secs: 10,

			listen: "127.0.0.1:3000".to_string(),
		}
	}
}

impl Config {
	/// Defaults, then the optional config file, then the process environment
	pub fn load(file: Option<&Path>) -> Result<Config, ConfigError> {
		let config = match file {
			Some(path) => Config::from_file(path)?,
			None => Config::default(),
		};
		let env: HashMap<String, String> = std::env::vars().collect();
		let config = config.with_env(&env)?;
		config.validate()?;
		Ok(config)
	}

	/// Parse a config file; `.json` files are JSON, anything else is TOML
	pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.display().to_string(),
			message: e.to_string(),
		})?;
		let is_json = path.extension().map(|ext| ext.eq_ignore_ascii_case("json")).unwrap_or(false);
		if is_json {
			serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
				path: path.display().to_string(),
				message: e.to_string(),
			})
		} else {
			toml::from_str(&text).map_err(|e| ConfigError::Parse {
				path: path.display().to_string(),
				message: e.to_string(),
			})
		}
	}

	/// Apply environment overrides. Empty values are ignored.
	pub fn with_env(mut self, env: &HashMap<String, String>) -> Result<Config, ConfigError> {
		let lookup = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

		if let Some(token) = lookup(TOKEN_ENV) {
			self.token = Some(Credential::new(token));
		}

		let var = |name: &str| format!("{}{}", ENV_PREFIX, name);
		if let Some(v) = lookup(&var("OWNER")) {
			self.owner = v.to_string();
		}
		if let Some(v) = lookup(&var("REPO")) {
			self.repo = v.to_string();
		}
		if let Some(v) = lookup(&var("BRANCH")) {
			self.branch = v.to_string();
		}
		if let Some(v) = lookup(&var("API_BASE")) {
			self.api_base = v.to_string();
		}
		if let Some(v) = lookup(&var("USER_AGENT")) {
			self.user_agent = v.to_string();
		}
		if let Some(v) = lookup(&var("DEFAULT_READ_PATH")) {
			self.default_read_path = v.to_string();
		}
		if let Some(v) = lookup(&var("DEFAULT_WRITE_PATH")) {
			self.default_write_path = v.to_string();
		}
		if let Some(v) = lookup(&var("COMMIT_MESSAGE_PREFIX")) {
			self.commit_message_prefix = v.to_string();
		}
		if let Some(v) = lookup(&var("READ_TIMEOUT_SECS")) {
			self.read_timeout_secs = parse_secs(&var("READ_TIMEOUT_SECS"), v)?;
		}
		if let Some(v) = lookup(&var("WRITE_TIMEOUT_SECS")) {
			self.write_timeout_secs = parse_secs(&var("WRITE_TIMEOUT_SECS"), v)?;
		}
		if let Some(v) = lookup(&var("LISTEN")) {
			self.listen = v.to_string();
		}
		Ok(self)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_identifier("owner", &self.owner)?;
		validate_identifier("repo", &self.repo)?;
		validate_identifier("branch", &self.branch)?;
		validate_api_base(&self.api_base)?;
		validate_read_timeout(self.read_timeout_secs)?;
		self.listen_addr()?;
		Ok(())
	}

	pub fn has_credential(&self) -> bool {
		self.token.is_some()
	}

	pub fn read_timeout(&self) -> Duration {
		Duration::from_secs(self.read_timeout_secs)
	}

	/// `None` when writes run without a time bound
	pub fn write_timeout(&self) -> Option<Duration> {
		match self.write_timeout_secs {
			0 => None,
			secs => Some(Duration::from_secs(secs)),
		}
	}

	pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
		self.listen.parse().map_err(|_| ConfigError::Invalid {
			field: "listen",
			message: format!("not a socket address: {}", self.listen),
		})
	}
}

fn parse_secs(name: &str, value: &str) -> Result<u64, ConfigError> {
	value.parse::<u64>().map_err(|_| ConfigError::Invalid {
		field: "timeout",
		message: format!("{} must be a whole number of seconds, got {:?}", name, value),
	})
}

// ============================================================================
// VALIDATION
// ============================================================================

fn validate_identifier(field: &'static str, value: &str) -> Result<(), ConfigError> {
	if value.trim().is_empty() {
		return Err(ConfigError::Invalid { field, message: "must not be empty".to_string() });
	}
	if value.contains('/') && field != "branch" {
		return Err(ConfigError::Invalid {
			field,
			message: format!("must not contain '/', got {:?}", value),
		});
	}
	Ok(())
}

fn validate_api_base(api_base: &str) -> Result<(), ConfigError> {
	match reqwest::Url::parse(api_base) {
		Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
		_ => Err(ConfigError::Invalid {
			field: "apiBase",
			message: format!("not an http(s) URL: {}", api_base),
		}),
	}
}

fn validate_read_timeout(secs: u64) -> Result<(), ConfigError> {
	if secs == 0 {
		return Err(ConfigError::Invalid {
			field: "readTimeoutSecs",
			message: "must be greater than 0".to_string(),
		});
	}
	if secs > 3600 {
		return Err(ConfigError::Invalid {
			field: "readTimeoutSecs",
			message: format!("too large: {} seconds (max 3600)", secs),
		});
	}
	Ok(())
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
	/// Config file could not be read
	Io { path: String, message: String },

	/// Config file is not valid TOML/JSON for this struct
	Parse { path: String, message: String },

	/// A value is out of range or malformed
	Invalid { field: &'static str, message: String },
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Io { path, message } => {
				write!(f, "Cannot read config file {}: {}", path, message)
			}
			ConfigError::Parse { path, message } => {
				write!(f, "Cannot parse config file {}: {}", path, message)
			}
			ConfigError::Invalid { field, message } => {
				write!(f, "Invalid configuration for {}: {}", field, message)
			}
		}
	}
}

impl std::error::Error for ConfigError {}


// vim: ts=4
