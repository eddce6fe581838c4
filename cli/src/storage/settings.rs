//! Settings file management

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::PortainerError;
use crate::logs::LogLevel;

/// Optional JSON settings file
///
/// Every field is optional; command-line flags and environment variables
/// take precedence over values found here.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: Option<LogLevel>,

    /// Portainer server URL, without the `/api` suffix
    pub portainer_url: Option<String>,

    pub portainer_api_key: Option<String>,

    pub endpoint_id: Option<u64>,

    pub swarm_id: Option<String>,

    pub tls_skip_verify: Option<bool>,

    /// Request deadline in seconds
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("log_level", &self.log_level)
            .field("portainer_url", &self.portainer_url)
            .field(
                "portainer_api_key",
                &self.portainer_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("endpoint_id", &self.endpoint_id)
            .field("swarm_id", &self.swarm_id)
            .field("tls_skip_verify", &self.tls_skip_verify)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: &Path) -> Result<Self, PortainerError> {
        debug!("Reading settings from {}", path.display());
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            PortainerError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            PortainerError::ConfigError(format!("invalid settings in {}: {}", path.display(), e))
        })
    }

    /// Load from `path` when given, defaults otherwise
    pub async fn load_optional(path: Option<&Path>) -> Result<Self, PortainerError> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings() {
        let settings: Settings = serde_json::from_str(
            r#"{"portainer_url": "https://portainer.local", "endpoint_id": 2, "log_level": "debug"}"#,
        )
        .unwrap();

        assert_eq!(settings.portainer_url.as_deref(), Some("https://portainer.local"));
        assert_eq!(settings.endpoint_id, Some(2));
        assert_eq!(settings.log_level, Some(LogLevel::Debug));
        assert!(settings.portainer_api_key.is_none());
        assert!(settings.tls_skip_verify.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = Settings {
            portainer_api_key: Some("ptr_very_secret".to_string()),
            ..Default::default()
        };
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("ptr_very_secret"));
        assert!(printed.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let path = std::env::temp_dir().join("portainer-util-missing-settings.json");
        let err = Settings::load(&path).await.unwrap_err();
        assert!(matches!(err, PortainerError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_load_file() {
        let path = std::env::temp_dir().join(format!(
            "portainer-util-settings-{}.json",
            std::process::id()
        ));
        tokio::fs::write(&path, r#"{"swarm_id": "abc", "timeout_secs": 10}"#)
            .await
            .unwrap();

        let settings = Settings::load_optional(Some(&path)).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(settings.swarm_id.as_deref(), Some("abc"));
        assert_eq!(settings.timeout_secs, Some(10));
    }
}
