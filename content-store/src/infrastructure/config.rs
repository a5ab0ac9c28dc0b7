//! Configuration management for the storage and pinning backends

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const INFURA_IPFS_PROJECT_ID: &str = "INFURA_IPFS_PROJECT_ID";
pub const INFURA_IPFS_PROJECT_SECRET: &str = "INFURA_IPFS_PROJECT_SECRET";
pub const PINATA_API_KEY: &str = "PINATA_API_KEY";
pub const PINATA_SECRET_KEY: &str = "PINATA_SECRET_KEY";
pub const IPFS_API_URL: &str = "IPFS_API_URL";
pub const PINATA_API_URL: &str = "PINATA_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Primary storage (IPFS HTTP RPC) configuration
    #[serde(default)]
    pub ipfs: IpfsConfig,

    /// Pinning service configuration
    #[serde(default)]
    pub pinata: PinataConfig,
}

impl StoreConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::Io(e.to_string()))?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(content).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }

    /// Build configuration from the process environment, reading `.env` first
    /// when one exists.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::default().with_env_overrides()
    }

    /// Overlay values set in the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Overlay values produced by `lookup`, keyed by environment variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(INFURA_IPFS_PROJECT_ID) {
            self.ipfs.project_id = Some(v);
        }
        if let Some(v) = lookup(INFURA_IPFS_PROJECT_SECRET) {
            self.ipfs.project_secret = Some(v);
        }
        if let Some(v) = lookup(PINATA_API_KEY) {
            self.pinata.api_key = Some(v);
        }
        if let Some(v) = lookup(PINATA_SECRET_KEY) {
            self.pinata.secret_key = Some(v);
        }
        if let Some(v) = lookup(IPFS_API_URL) {
            self.ipfs.api_url = v;
        }
        if let Some(v) = lookup(PINATA_API_URL) {
            self.pinata.api_url = v;
        }
        self
    }

    /// Check that every credential is present and the settings are usable.
    ///
    /// Credentials are checked in a fixed order and the first missing one is
    /// reported. An empty or blank value counts as missing.
    pub fn validate(&self) -> Result<Credentials, ConfigurationError> {
        let ipfs_project_id = required(INFURA_IPFS_PROJECT_ID, &self.ipfs.project_id)?;
        let ipfs_project_secret = required(INFURA_IPFS_PROJECT_SECRET, &self.ipfs.project_secret)?;
        let pinata_api_key = required(PINATA_API_KEY, &self.pinata.api_key)?;
        let pinata_secret_key = required(PINATA_SECRET_KEY, &self.pinata.secret_key)?;

        if self.ipfs.cid_version > 1 {
            return Err(ConfigurationError::InvalidValue(format!(
                "ipfs.cid_version must be 0 or 1, got {}",
                self.ipfs.cid_version
            )));
        }

        Ok(Credentials {
            ipfs_project_id,
            ipfs_project_secret,
            pinata_api_key,
            pinata_secret_key,
        })
    }
}

fn required(name: &'static str, value: &Option<String>) -> Result<String, ConfigurationError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigurationError::MissingCredential(name)),
    }
}

/// IPFS HTTP RPC configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpfsConfig {
    /// Base URL of the RPC API (e.g., "https://ipfs.infura.io:5001")
    #[serde(default = "default_ipfs_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub project_secret: Option<String>,

    /// CID version requested on add (0 or 1)
    #[serde(default)]
    pub cid_version: u8,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: default_ipfs_api_url(),
            project_id: None,
            project_secret: None,
            cid_version: 0,
        }
    }
}

fn default_ipfs_api_url() -> String {
    "https://ipfs.infura.io:5001".to_string()
}

/// Pinata configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinataConfig {
    #[serde(default = "default_pinata_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub secret_key: Option<String>,
}

impl Default for PinataConfig {
    fn default() -> Self {
        Self {
            api_url: default_pinata_api_url(),
            api_key: None,
            secret_key: None,
        }
    }
}

fn default_pinata_api_url() -> String {
    "https://api.pinata.cloud".to_string()
}

/// The four validated secrets, held for the lifetime of the clients.
#[derive(Clone)]
pub struct Credentials {
    pub ipfs_project_id: String,
    pub ipfs_project_secret: String,
    pub pinata_api_key: String,
    pub pinata_secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ipfs_project_id", &self.ipfs_project_id)
            .field("ipfs_project_secret", &"<redacted>")
            .field("pinata_api_key", &self.pinata_api_key)
            .field("pinata_secret_key", &"<redacted>")
            .finish()
    }
}

/// Configuration error types. All of them are fatal at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Missing required environment variable: {0}")]
    MissingCredential(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidValue(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn complete_env() -> HashMap<&'static str, String> {
        HashMap::from([
            (INFURA_IPFS_PROJECT_ID, "project-id".to_string()),
            (INFURA_IPFS_PROJECT_SECRET, "project-secret".to_string()),
            (PINATA_API_KEY, "pinata-key".to_string()),
            (PINATA_SECRET_KEY, "pinata-secret".to_string()),
        ])
    }

    fn config_from(env: &HashMap<&'static str, String>) -> StoreConfig {
        StoreConfig::default().with_overrides(|name| env.get(name).cloned())
    }

    #[test]
    fn test_config_default() {
        let config = StoreConfig::default();
        assert_eq!(config.ipfs.api_url, "https://ipfs.infura.io:5001");
        assert_eq!(config.ipfs.cid_version, 0);
        assert_eq!(config.pinata.api_url, "https://api.pinata.cloud");
        assert!(config.ipfs.project_id.is_none());
    }

    #[test]
    fn test_validate_complete() {
        let credentials = config_from(&complete_env()).validate().unwrap();
        assert_eq!(credentials.ipfs_project_id, "project-id");
        assert_eq!(credentials.pinata_secret_key, "pinata-secret");
    }

    #[test]
    fn test_validate_names_each_missing_credential() {
        for name in [
            INFURA_IPFS_PROJECT_ID,
            INFURA_IPFS_PROJECT_SECRET,
            PINATA_API_KEY,
            PINATA_SECRET_KEY,
        ] {
            let mut env = complete_env();
            env.remove(name);

            let error = config_from(&env).validate().unwrap_err();
            assert_eq!(error, ConfigurationError::MissingCredential(name));
            assert_eq!(
                error.to_string(),
                format!("Missing required environment variable: {name}")
            );
        }
    }

    #[test]
    fn test_validate_reports_first_missing_in_order() {
        let mut env = complete_env();
        env.remove(PINATA_SECRET_KEY);
        env.remove(INFURA_IPFS_PROJECT_SECRET);

        let error = config_from(&env).validate().unwrap_err();
        assert_eq!(
            error,
            ConfigurationError::MissingCredential(INFURA_IPFS_PROJECT_SECRET)
        );
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let mut env = complete_env();
        env.insert(PINATA_API_KEY, "   ".to_string());

        let error = config_from(&env).validate().unwrap_err();
        assert_eq!(error, ConfigurationError::MissingCredential(PINATA_API_KEY));
    }

    #[test]
    fn test_invalid_cid_version_rejected() {
        let mut config = config_from(&complete_env());
        config.ipfs.cid_version = 2;

        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_config_from_str() {
        let toml_content = r#"
[ipfs]
api_url = "http://127.0.0.1:5001"
project_id = "file-id"
project_secret = "file-secret"
cid_version = 1

[pinata]
api_key = "file-key"
secret_key = "file-secret-key"
"#;

        let config = StoreConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.ipfs.api_url, "http://127.0.0.1:5001");
        assert_eq!(config.ipfs.cid_version, 1);
        assert_eq!(config.pinata.api_key, Some("file-key".to_string()));
        // Omitted fields fall back to defaults
        assert_eq!(config.pinata.api_url, "https://api.pinata.cloud");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_take_precedence_over_file() {
        let toml_content = r#"
[pinata]
api_key = "file-key"
"#;
        let env = HashMap::from([
            (PINATA_API_KEY, "env-key".to_string()),
            (PINATA_API_URL, "http://localhost:9999".to_string()),
        ]);

        let config = StoreConfig::from_toml_str(toml_content)
            .unwrap()
            .with_overrides(|name| env.get(name).cloned());

        assert_eq!(config.pinata.api_key, Some("env-key".to_string()));
        assert_eq!(config.pinata.api_url, "http://localhost:9999");
    }

    #[test]
    fn test_config_invalid_toml() {
        let result = StoreConfig::from_toml_str("invalid toml content [");
        assert!(matches!(result, Err(ConfigurationError::Parse(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = StoreConfig::from_file("/no/such/config.toml");
        assert!(matches!(result, Err(ConfigurationError::Io(_))));
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let credentials = config_from(&complete_env()).validate().unwrap();
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("project-secret"));
        assert!(!debug.contains("pinata-secret"));
    }
}
