//! Stack models

pub mod lifecycle;
pub mod stack;

pub use portainer_openapi::{AutoUpdate, Stack, StackEnv};
