//! Portainer API client

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::error;
use url::Url;

use portainer_openapi::ErrorBody;

use crate::errors::PortainerError;
use crate::http::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

/// Connection parameters for one command invocation
#[derive(Debug)]
pub struct ConnectionConfig {
    /// API base URL, `<portainer-url>/api`
    pub base_url: String,

    pub api_key: SecretString,

    /// Default endpoint targeted by new stacks
    pub endpoint_id: u64,

    pub swarm_id: String,

    /// Accept any server certificate
    pub tls_skip_verify: bool,

    /// Request deadline; requests may block indefinitely when unset
    pub timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Build a configuration from the Portainer server URL.
    ///
    /// The URL must be absolute http(s); `/api` is appended to it.
    pub fn new(
        portainer_url: &str,
        api_key: SecretString,
        endpoint_id: u64,
        swarm_id: impl Into<String>,
        tls_skip_verify: bool,
    ) -> Result<Self, PortainerError> {
        let parsed = Url::parse(portainer_url).map_err(|e| {
            PortainerError::ConfigError(format!("invalid Portainer URL {}: {}", portainer_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PortainerError::ConfigError(format!(
                "unsupported URL scheme {} in {}",
                parsed.scheme(),
                portainer_url
            )));
        }

        Ok(Self {
            base_url: format!("{}/api", portainer_url.trim_end_matches('/')),
            api_key,
            endpoint_id,
            swarm_id: swarm_id.into(),
            tls_skip_verify,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the Portainer stack API
pub struct PortainerClient<T: Transport = ReqwestTransport> {
    config: ConnectionConfig,
    transport: T,
}

impl PortainerClient<ReqwestTransport> {
    /// Create a client backed by reqwest. No request is made here.
    pub fn new(config: ConnectionConfig) -> Result<Self, PortainerError> {
        let transport = ReqwestTransport::new(
            &config.base_url,
            SecretString::from(config.api_key.expose_secret().to_string()),
            config.tls_skip_verify,
            config.timeout,
        )?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> PortainerClient<T> {
    /// Create a client over an arbitrary transport
    pub fn with_transport(config: ConnectionConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request, turning any non-2xx status into an error
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<ApiResponse, PortainerError> {
        let method = request.method.clone();
        let path = request.path.clone();
        let response = self.transport.execute(request).await?;

        if !response.status.is_success() {
            error!("HTTP {} {} failed: {}", method, path, response.status);
            return Err(status_error(&response));
        }

        Ok(response)
    }

    /// Send a request and decode a JSON body
    pub(crate) async fn send_json(
        &self,
        request: ApiRequest,
    ) -> Result<serde_json::Value, PortainerError> {
        let response = self.send(request).await?;
        let value = serde_json::from_str(&response.body)?;
        Ok(value)
    }
}

/// Error for a non-2xx response, with the server's message when it sent one
pub(crate) fn status_error(response: &ApiResponse) -> PortainerError {
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .map(|body| body.message)
        .filter(|message| !message.is_empty());
    PortainerError::UnexpectedStatus {
        status: response.status,
        message,
    }
}
