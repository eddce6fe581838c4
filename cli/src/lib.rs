//! Portainer stack management
//!
//! Looks up, creates and deletes Git-backed Docker Swarm stacks through the
//! Portainer HTTP API.

pub mod app;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod storage;
pub mod utils;
