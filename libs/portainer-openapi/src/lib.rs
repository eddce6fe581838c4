//! Portainer API wire models
//!
//! Request and response bodies exchanged with the Portainer stack API.

pub mod models;

pub use models::{AutoUpdate, ErrorBody, GitConfig, Stack, StackEntry, StackEnv};
