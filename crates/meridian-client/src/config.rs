//! # Client Configuration
//!
//! Where the backend lives, how to authenticate, and which business context
//! the register starts in.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MERIDIAN_API_URL=https://api.example.com                           │
//! │     MERIDIAN_OUTLET_ID=outlet-1                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/meridian-pos/meridian.toml (Linux)                       │
//! │     ~/Library/Application Support/com.meridian.pos/meridian.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8080, 15 second timeout                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # meridian.toml
//! [api]
//! base_url = "https://api.example.com"
//! token = "..."
//! request_timeout_secs = 15
//!
//! [context]
//! tenant_id = "tenant-1"
//! outlet_id = "outlet-1"
//! till_id = "till-3"
//! user_id = "user-9"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use meridian_core::BusinessContext;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// File name used inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "meridian.toml";

// =============================================================================
// API Settings
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the backend, e.g. `https://api.example.com`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            token: None,
            request_timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Context Settings
// =============================================================================

/// Business context the register starts in. Everything but the tenant can be
/// changed at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSettings {
    #[serde(default)]
    pub tenant_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlet_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub till_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

// =============================================================================
// Main Config
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub context: ContextSettings,
}

impl ClientConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from TOML file if it exists
    /// 3. Override with environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::load_file(config_path)?;

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Reads only the TOML file (defaults if it does not exist), without
    /// environment overrides or validation. This is what [`ClientConfig::save`]
    /// should write back, so environment values never end up on disk.
    pub fn load_file(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let Some(path) = config_path.or_else(Self::default_config_path) else {
            return Ok(Self::default());
        };

        if !path.exists() {
            debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        info!(?path, "Loading client config from file");
        let contents = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.context.tenant_id.trim().is_empty() {
            return Err(ClientError::InvalidConfig("tenant_id is required".into()));
        }

        Ok(())
    }

    /// Applies overrides from a key lookup (the process environment in
    /// [`ClientConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MERIDIAN_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(token) = lookup("MERIDIAN_API_TOKEN") {
            self.api.token = Some(token);
        }

        if let Some(timeout) = lookup("MERIDIAN_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.request_timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric MERIDIAN_TIMEOUT_SECS"),
            }
        }

        if let Some(tenant) = lookup("MERIDIAN_TENANT_ID") {
            self.context.tenant_id = tenant;
        }

        if let Some(outlet) = lookup("MERIDIAN_OUTLET_ID") {
            debug!(outlet_id = %outlet, "Overriding outlet from environment");
            self.context.outlet_id = Some(outlet);
        }

        if let Some(till) = lookup("MERIDIAN_TILL_ID") {
            self.context.till_id = Some(till);
        }

        if let Some(user) = lookup("MERIDIAN_USER_ID") {
            self.context.user_id = Some(user);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "meridian", "pos")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Parsed base URL.
    pub fn base_url(&self) -> ClientResult<Url> {
        Ok(Url::parse(&self.api.base_url)?)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Business context the register starts in.
    pub fn initial_context(&self) -> BusinessContext {
        BusinessContext {
            tenant_id: self.context.tenant_id.clone(),
            outlet_id: self.context.outlet_id.clone(),
            till_id: self.context.till_id.clone(),
            user_id: self.context.user_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid_config() -> ClientConfig {
        let mut config = ClientConfig::default();
        config.context.tenant_id = "tenant-1".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.request_timeout_secs, 15);
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert!(config.context.outlet_id.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        // Tenant is required
        config.context.tenant_id = String::new();
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));

        // Non-HTTP scheme should fail
        config.context.tenant_id = "tenant-1".to_string();
        config.api.base_url = "ws://localhost:8080".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        // Unparseable URL should fail
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        // Zero timeout should fail
        config.api.base_url = "https://api.example.com".to_string();
        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("MERIDIAN_API_URL", "https://pos.example.com"),
            ("MERIDIAN_TIMEOUT_SECS", "30"),
            ("MERIDIAN_TENANT_ID", "tenant-9"),
            ("MERIDIAN_OUTLET_ID", "outlet-2"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://pos.example.com");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.context.tenant_id, "tenant-9");
        assert_eq!(config.context.outlet_id.as_deref(), Some("outlet-2"));
        assert_eq!(config.context.till_id, None);
    }

    #[test]
    fn test_bad_timeout_override_is_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|key| (key == "MERIDIAN_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(config.api.request_timeout_secs, 15);
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
            [api]
            base_url = "https://api.example.com"
            token = "secret"

            [context]
            tenant_id = "tenant-1"
            outlet_id = "outlet-1"
        "#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.request_timeout_secs, 15);

        let ctx = config.initial_context();
        assert_eq!(ctx.tenant_id, "tenant-1");
        assert_eq!(ctx.outlet_id.as_deref(), Some("outlet-1"));
        assert_eq!(ctx.till_id, None);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&valid_config()).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[context]"));
    }

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("meridian-{}", uuid::Uuid::new_v4()))
            .join(CONFIG_FILE_NAME)
    }

    #[test]
    fn test_save_and_load_file() {
        let path = temp_config_path();
        let mut config = valid_config();
        config.context.outlet_id = Some("outlet-7".to_string());

        // Missing parent directories are created
        config.save(Some(path.clone())).unwrap();
        let loaded = ClientConfig::load_file(Some(path.clone())).unwrap();
        std::fs::remove_dir_all(path.parent().unwrap()).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_file_missing_is_default() {
        let loaded = ClientConfig::load_file(Some(temp_config_path())).unwrap();
        assert_eq!(loaded, ClientConfig::default());
    }

    #[test]
    fn test_load_file_rejects_bad_toml() {
        let path = temp_config_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let result = ClientConfig::load_file(Some(path.clone()));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();

        assert!(matches!(result, Err(ClientError::ConfigLoadFailed(_))));
    }

    #[test]
    fn test_save_into_a_file_path_fails() {
        let blocker = temp_config_path();
        std::fs::create_dir_all(blocker.parent().unwrap()).unwrap();
        std::fs::write(&blocker, "").unwrap();

        // The parent of this path is a regular file
        let result = valid_config().save(Some(blocker.join(CONFIG_FILE_NAME)));
        std::fs::remove_dir_all(blocker.parent().unwrap()).ok();

        assert!(matches!(result, Err(ClientError::ConfigSaveFailed(_))));
    }
}
