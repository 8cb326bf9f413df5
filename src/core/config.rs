//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.ross/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RossConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    pub login_path: Option<String>,
    pub storage_path: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/gemini/generate-content";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub endpoint: String,
    /// `None` when `timeout_secs = 0` (wait indefinitely).
    pub timeout: Option<Duration>,
    pub login_path: String,
    pub storage_path: PathBuf,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.ross/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".ross").join("config.toml"))
}

/// Load config from `~/.ross/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RossConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<RossConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RossConfig::default());
        }
    };
    load_config_from(&path)
}

/// Same as [`load_config`] for an explicit path.
pub fn load_config_from(path: &Path) -> Result<RossConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(RossConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RossConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# Ross Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [endpoint]
# url = "http://localhost:8080/gemini/generate-content"   # Or set ROSS_ENDPOINT
# timeout_secs = 120                                      # 0 waits forever

# [auth]
# login_path = "/login"                 # Or set ROSS_LOGIN_PATH
# storage_path = "~/.ross/storage.json" # Or set ROSS_STORAGE_PATH
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_endpoint` comes from the `--endpoint` flag (None = not specified).
pub fn resolve(config: &RossConfig, cli_endpoint: Option<&str>) -> ResolvedConfig {
    resolve_with(config, cli_endpoint, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an explicit environment lookup.
pub fn resolve_with(
    config: &RossConfig,
    cli_endpoint: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Endpoint: CLI → env → config → default
    let endpoint = cli_endpoint
        .map(|s| s.to_string())
        .or_else(|| env("ROSS_ENDPOINT"))
        .or_else(|| config.endpoint.url.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    // Login path: env → config → default
    let login_path = env("ROSS_LOGIN_PATH")
        .or_else(|| config.auth.login_path.clone())
        .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string());

    // Storage path: env → config → ~/.ross/storage.json
    let storage_path = env("ROSS_STORAGE_PATH")
        .or_else(|| config.auth.storage_path.clone())
        .map(|p| expand_home(&p))
        .or_else(crate::core::credentials::default_store_path)
        .unwrap_or_else(|| PathBuf::from("storage.json"));

    let timeout = match config.endpoint.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    ResolvedConfig {
        endpoint,
        timeout,
        login_path,
        storage_path,
    }
}

/// Expands a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = RossConfig::default();
        assert!(config.endpoint.url.is_none());
        assert!(config.auth.login_path.is_none());
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn file_config() -> RossConfig {
        RossConfig {
            endpoint: EndpointConfig {
                url: Some("http://from-config/generate".to_string()),
                timeout_secs: Some(5),
            },
            auth: AuthConfig {
                login_path: Some("/signin".to_string()),
                storage_path: Some("/tmp/ross-test/storage.json".to_string()),
            },
        }
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with(&RossConfig::default(), None, no_env);
        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.login_path, DEFAULT_LOGIN_PATH);
        assert_eq!(
            resolved.timeout,
            Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        );
        if let Some(default_path) = crate::core::credentials::default_store_path() {
            assert_eq!(resolved.storage_path, default_path);
        }
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let resolved = resolve_with(&file_config(), None, no_env);
        assert_eq!(resolved.endpoint, "http://from-config/generate");
        assert_eq!(resolved.login_path, "/signin");
        assert_eq!(
            resolved.storage_path,
            PathBuf::from("/tmp/ross-test/storage.json")
        );
        assert_eq!(resolved.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_resolve_env_overrides_config_file() {
        let env = |key: &str| match key {
            "ROSS_ENDPOINT" => Some("http://from-env/generate".to_string()),
            "ROSS_LOGIN_PATH" => Some("/env-login".to_string()),
            "ROSS_STORAGE_PATH" => Some("/tmp/ross-env/storage.json".to_string()),
            _ => None,
        };
        let resolved = resolve_with(&file_config(), None, env);
        assert_eq!(resolved.endpoint, "http://from-env/generate");
        assert_eq!(resolved.login_path, "/env-login");
        assert_eq!(
            resolved.storage_path,
            PathBuf::from("/tmp/ross-env/storage.json")
        );
    }

    #[test]
    fn test_resolve_cli_endpoint_overrides_env() {
        let env = |key: &str| (key == "ROSS_ENDPOINT").then(|| "http://from-env/gen".to_string());
        let resolved = resolve_with(&file_config(), Some("http://from-cli/generate"), env);
        assert_eq!(resolved.endpoint, "http://from-cli/generate");
        assert_eq!(resolved.login_path, "/signin");
    }

    #[test]
    fn test_resolve_expands_home_in_storage_path() {
        let env =
            |key: &str| (key == "ROSS_STORAGE_PATH").then(|| "~/custom/storage.json".to_string());
        let resolved = resolve_with(&RossConfig::default(), None, env);
        if let Some(home) = dirs::home_dir() {
            assert_eq!(resolved.storage_path, home.join("custom/storage.json"));
        }
    }

    #[test]
    fn test_zero_timeout_disables_timeout() {
        let config = RossConfig {
            endpoint: EndpointConfig {
                url: None,
                timeout_secs: Some(0),
            },
            ..Default::default()
        };
        assert_eq!(resolve_with(&config, None, no_env).timeout, None);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/x.json"), home.join("x.json"));
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[endpoint]
url = "https://gen.example.com/gemini/generate-content"
timeout_secs = 30

[auth]
login_path = "/auth/login"
storage_path = "~/.ross/other.json"
"#;
        let config: RossConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.endpoint.url.as_deref(),
            Some("https://gen.example.com/gemini/generate-content")
        );
        assert_eq!(config.endpoint.timeout_secs, Some(30));
        assert_eq!(config.auth.login_path.as_deref(), Some("/auth/login"));
        assert_eq!(
            config.auth.storage_path.as_deref(),
            Some("~/.ross/other.json")
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[auth]
login_path = "/signin"
"#;
        let config: RossConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.auth.login_path.as_deref(), Some("/signin"));
        assert!(config.endpoint.url.is_none());
        assert!(config.auth.storage_path.is_none());
    }

    #[test]
    fn test_generated_default_is_valid_toml() {
        let config: RossConfig = toml::from_str(DEFAULT_CONFIG_CONTENT).unwrap();
        assert!(config.endpoint.url.is_none());
    }

    #[test]
    fn test_load_config_from_generates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ross").join("config.toml");
        let config = load_config_from(&path).unwrap();
        assert!(config.endpoint.url.is_none());
        assert!(path.exists());
    }

    #[test]
    fn test_load_config_from_malformed_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[endpoint\nurl = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
