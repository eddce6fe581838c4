//! Command options and their resolution into client configuration

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::PortainerError;
use crate::http::client::ConnectionConfig;
use crate::models::{AutoUpdate, Stack};
use crate::storage::settings::Settings;

/// Default compose file inside the repository
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yaml";

/// Default Git reference
pub const DEFAULT_REFERENCE_NAME: &str = "refs/heads/main";

/// Default auto-update polling interval
pub const DEFAULT_AUTO_UPDATE_INTERVAL: &str = "5m";

/// Connection options as given on the command line or environment
#[derive(Clone, Default)]
pub struct ConnectionOptions {
    pub portainer_url: Option<String>,
    pub portainer_api_key: Option<String>,
    pub endpoint_id: Option<u64>,
    pub swarm_id: Option<String>,
    pub tls_skip_verify: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl ConnectionOptions {
    /// Merge with the settings file and validate.
    ///
    /// Fails before any network activity when the URL, API key or endpoint
    /// id is missing from both sources.
    pub fn resolve(self, settings: &Settings) -> Result<ConnectionConfig, PortainerError> {
        let portainer_url = self
            .portainer_url
            .or_else(|| settings.portainer_url.clone())
            .ok_or_else(|| missing("portainer-url"))?;
        let api_key = self
            .portainer_api_key
            .or_else(|| settings.portainer_api_key.clone())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| missing("portainer-api-key"))?;
        let endpoint_id = self
            .endpoint_id
            .or(settings.endpoint_id)
            .ok_or_else(|| missing("endpoint-id"))?;
        let swarm_id = self
            .swarm_id
            .or_else(|| settings.swarm_id.clone())
            .unwrap_or_default();
        let tls_skip_verify = self
            .tls_skip_verify
            .or(settings.tls_skip_verify)
            .unwrap_or(false);
        let timeout = self
            .timeout_secs
            .or(settings.timeout_secs)
            .map(Duration::from_secs);

        let config = ConnectionConfig::new(
            &portainer_url,
            SecretString::from(api_key),
            endpoint_id,
            swarm_id,
            tls_skip_verify,
        )?;
        Ok(config.with_timeout(timeout))
    }
}

fn missing(flag: &str) -> PortainerError {
    PortainerError::ConfigError(format!("can't get {} parameter", flag))
}

/// Options of the `createStack` command
#[derive(Debug)]
pub struct CreateStackOptions {
    pub name: String,
    pub compose_file: String,
    pub additional_files: Vec<String>,
    pub repository_url: String,
    pub repository_reference_name: String,
    pub repository_username: String,
    pub repository_password: SecretString,
    pub env: Vec<(String, String)>,
    pub auto_update_interval: String,
}

impl CreateStackOptions {
    /// Build the create payload targeting the configured endpoint and swarm
    pub fn to_stack(&self, config: &ConnectionConfig) -> Stack {
        Stack {
            id: None,
            name: self.name.clone(),
            repository_url: self.repository_url.clone(),
            repository_reference_name: self.repository_reference_name.clone(),
            repository_username: self.repository_username.clone(),
            repository_password: self.repository_password.expose_secret().to_string(),
            repository_authentication: true,
            compose_file: self.compose_file.clone(),
            additional_files: self.additional_files.clone(),
            from_app_template: false,
            endpoint_id: config.endpoint_id,
            swarm_id: config.swarm_id.clone(),
            tls_skip_verify: config.tls_skip_verify,
            env: Stack::env_from_pairs(self.env.iter().cloned()),
            auto_update: AutoUpdate {
                interval: self.auto_update_interval.clone(),
                ..Default::default()
            },
        }
    }
}

/// Options of the `deleteStack` command
#[derive(Debug, Clone)]
pub struct DeleteStackOptions {
    pub name: String,
}
