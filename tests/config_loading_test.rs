/// Integration tests for config loading
/// Tests that config files are parsed and layered under environment overrides
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use syncproxy::config::{Config, ConfigError};

#[test]
fn test_toml_config_file() {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let path = temp_dir.path().join("syncproxy.toml");
	fs::write(
		&path,
		r#"
owner = "acme"
repo = "inventory"
branch = "data"
defaultReadPath = "inventory/items.json"
readTimeoutSecs = 5
writeTimeoutSecs = 0
"#,
	)
	.expect("Failed to write config file");

	let config = Config::from_file(&path).unwrap();
	assert_eq!(config.owner, "acme");
	assert_eq!(config.repo, "inventory");
	assert_eq!(config.branch, "data");
	assert_eq!(config.default_read_path, "inventory/items.json");
	assert_eq!(config.read_timeout(), Duration::from_secs(5));
	assert_eq!(config.write_timeout(), None);

	// Unset keys keep their defaults
	assert_eq!(config.default_write_path, "data/coleccion.json");
	assert_eq!(config.api_base, "https://api.github.com");
	assert!(config.validate().is_ok());
}

#[test]
fn test_json_config_file() {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let path = temp_dir.path().join("syncproxy.json");
	fs::write(&path, r#"{ "repo": "numismatica-dev", "listen": "0.0.0.0:8080" }"#).unwrap();

	let config = Config::from_file(&path).unwrap();
	assert_eq!(config.repo, "numismatica-dev");
	assert_eq!(config.listen_addr().unwrap().port(), 8080);
}

#[test]
fn test_environment_wins_over_file() {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let path = temp_dir.path().join("syncproxy.toml");
	fs::write(&path, "owner = \"from-file\"\ntoken = \"file-token\"\n").unwrap();

	let file_config = Config::from_file(&path).unwrap();
	assert_eq!(file_config.token.as_ref().map(|t| t.expose()), Some("file-token"));

	let env: HashMap<String, String> = [
		("GITHUB_TOKEN".to_string(), "env-token".to_string()),
		("SYNCPROXY_OWNER".to_string(), "from-env".to_string()),
	]
	.into_iter()
	.collect();
	let config = file_config.with_env(&env).unwrap();
	assert_eq!(config.owner, "from-env");
	assert_eq!(config.token.as_ref().map(|t| t.expose()), Some("env-token"));
}

#[test]
fn test_missing_file_is_io_error() {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let result = Config::from_file(&temp_dir.path().join("absent.toml"));
	assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_malformed_file_is_parse_error() {
	let temp_dir = TempDir::new().expect("Failed to create temp dir");
	let path = temp_dir.path().join("broken.toml");
	fs::write(&path, "readTimeoutSecs = \"ten\"").unwrap();

	let err = Config::from_file(&path).unwrap_err();
	assert!(matches!(err, ConfigError::Parse { .. }));
	assert!(err.to_string().contains("broken.toml"));
}

// vim: ts=4
