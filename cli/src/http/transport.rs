//! Request transport
//!
//! The client speaks to Portainer through the [`Transport`] trait so that
//! request sequencing can be observed without a network.

use std::time::Duration;

use async_trait::async_trait;
use http::{Method, StatusCode};
use reqwest::{header, Client};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::errors::PortainerError;

/// Header carrying the Portainer access token
pub const API_KEY_HEADER: &str = "X-API-Key";

/// A request relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
        }
    }
}

/// Raw response: status plus body text
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the response, whatever its status.
    ///
    /// Only transport-level failures (DNS, connect, TLS) are errors here.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, PortainerError>;
}

/// reqwest-backed transport
///
/// Each instance owns its own connection pool and TLS policy.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl ReqwestTransport {
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        tls_skip_verify: bool,
        timeout: Option<Duration>,
    ) -> Result<Self, PortainerError> {
        let mut builder = Client::builder().danger_accept_invalid_certs(tls_skip_verify);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, PortainerError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(API_KEY_HEADER, self.api_key.expose_secret());

        if request.method != Method::GET {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("{} {} -> {}", request.method, url, status);

        Ok(ApiResponse { status, body })
    }
}
