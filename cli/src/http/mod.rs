//! HTTP client for the Portainer API

pub mod client;
pub mod stacks;
pub mod transport;

pub use client::{ConnectionConfig, PortainerClient};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
