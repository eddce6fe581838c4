//! Error types for portainer-util

use http::StatusCode;
use thiserror::Error;

/// Main error type for Portainer operations
#[derive(Error, Debug)]
pub enum PortainerError {
    #[error("JSON error")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The response was well-formed JSON of the wrong shape
    #[error("Cannot decode {context}: {reason}")]
    DecodeError { context: String, reason: String },

    /// The server answered with a non-2xx status
    #[error("Unexpected response status {status}{}", format_message(.message))]
    UnexpectedStatus {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Stack {0} already exists")]
    StackAlreadyExists(String),

    #[error("Stack {0} does not exist")]
    StackNotFound(String),

    #[error("Invalid stack transition: {0}")]
    InvalidTransition(String),
}

fn format_message(message: &Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!(": {}", message),
        _ => String::new(),
    }
}

impl PortainerError {
    pub fn decode(context: impl Into<String>, reason: impl Into<String>) -> Self {
        PortainerError::DecodeError {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_carries_status_line() {
        let err = PortainerError::UnexpectedStatus {
            status: StatusCode::CONFLICT,
            message: Some("A stack with this name already exists".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected response status 409 Conflict: A stack with this name already exists"
        );

        let err = PortainerError::UnexpectedStatus {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        };
        assert_eq!(err.to_string(), "Unexpected response status 502 Bad Gateway");
    }

    #[test]
    fn test_source_is_reported_once_in_chain() {
        let json_err = serde_json::from_str::<serde_json::Value>("").unwrap_err();
        let reason = json_err.to_string();
        let chain = format!("{:#}", anyhow::Error::new(PortainerError::from(json_err)));
        assert_eq!(chain, format!("JSON error: {}", reason));
        assert_eq!(chain.matches("EOF while parsing").count(), 1);

        let http_err = reqwest::Client::new().get("not a url").build().unwrap_err();
        let reason = http_err.to_string();
        let chain = format!("{:#}", anyhow::Error::new(PortainerError::from(http_err)));
        assert!(chain.starts_with("HTTP error: "));
        assert_eq!(chain.matches(reason.as_str()).count(), 1);
    }
}
