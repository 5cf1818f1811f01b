//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.wayfarer/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! Debug builds default to a local API server; release builds point at the
//! production host.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WayfarerConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DEV_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_PROD_BASE_URL: &str = "https://api.wayfarer.app";

/// Debug builds talk to a local server unless told otherwise.
pub fn default_base_url() -> &'static str {
    if cfg!(debug_assertions) {
        DEFAULT_DEV_BASE_URL
    } else {
        DEFAULT_PROD_BASE_URL
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wayfarer")
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub data_dir: PathBuf,
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

/// Returns the path to `~/.wayfarer/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".wayfarer").join("config.toml"))
}

/// Load config from `~/.wayfarer/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `WayfarerConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<WayfarerConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(WayfarerConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(WayfarerConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: WayfarerConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Wayfarer Configuration
# All settings are optional - defaults are used for anything not specified.
# Override hierarchy: defaults -> this file -> env vars -> CLI flags.

# [general]
# data_dir = "/home/me/.wayfarer"    # Where session state is kept

# [api]
# base_url = "http://127.0.0.1:8000" # Or set WAYFARER_API_URL env var
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_base_url` is the `--api-url` flag (None = not specified).
pub fn resolve(config: &WayfarerConfig, cli_base_url: Option<&str>) -> ResolvedConfig {
    // Base URL: CLI → env → config → build-profile default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("WAYFARER_API_URL").ok())
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| default_base_url().to_string());

    // Data dir: env → config → ~/.wayfarer
    let data_dir = std::env::var("WAYFARER_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| config.general.data_dir.clone().map(PathBuf::from))
        .unwrap_or_else(default_data_dir);

    ResolvedConfig { base_url, data_dir }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = WayfarerConfig::default();
        assert!(config.api.base_url.is_none());
        assert!(config.general.data_dir.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = WayfarerConfig::default();
        let resolved = resolve(&config, None);
        assert_eq!(resolved.base_url, default_base_url());
        assert!(resolved.data_dir.ends_with(".wayfarer"));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = WayfarerConfig {
            api: ApiConfig {
                base_url: Some("http://10.0.0.2:9000".to_string()),
            },
            general: GeneralConfig {
                data_dir: Some("/tmp/wf".to_string()),
            },
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.base_url, "http://10.0.0.2:9000");
        assert_eq!(resolved.data_dir, PathBuf::from("/tmp/wf"));
    }

    #[test]
    fn test_resolve_cli_url_wins() {
        let config = WayfarerConfig {
            api: ApiConfig {
                base_url: Some("http://10.0.0.2:9000".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some("http://127.0.0.1:1234"));
        assert_eq!(resolved.base_url, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[api]
base_url = "http://192.168.1.20:8000"
"#;
        let config: WayfarerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.api.base_url.as_deref(),
            Some("http://192.168.1.20:8000")
        );
        assert!(config.general.data_dir.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
data_dir = "/data/wayfarer"

[api]
base_url = "https://staging.wayfarer.app"
"#;
        let config: WayfarerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.data_dir.as_deref(), Some("/data/wayfarer"));
        assert_eq!(
            config.api.base_url.as_deref(),
            Some("https://staging.wayfarer.app")
        );
    }
}
