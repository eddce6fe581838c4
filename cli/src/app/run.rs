//! Command handlers
//!
//! Each handler performs one lookup followed by at most one write, and
//! reports the outcome; the caller decides the exit status.

use tracing::{info, warn};

use crate::app::options::{CreateStackOptions, DeleteStackOptions};
use crate::errors::PortainerError;
use crate::http::client::PortainerClient;
use crate::http::transport::Transport;
use crate::models::Stack;

/// Result of a successful command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The stack was created
    Created(Stack),

    /// A stack with that name already existed; nothing was written
    Skipped(String),

    /// The stack was deleted
    Deleted(Stack),
}

/// Run `createStack`
pub async fn create_stack<T: Transport>(
    client: &PortainerClient<T>,
    options: &CreateStackOptions,
) -> Result<Outcome, PortainerError> {
    info!("Creating stack {}", options.name);

    let stack = options.to_stack(client.config());
    match client.create_stack(stack).await {
        Ok(created) => {
            match created.id {
                Some(id) => info!("Stack {} has been successfully created (id {})", created.name, id),
                None => info!("Stack {} has been successfully created", created.name),
            }
            Ok(Outcome::Created(created))
        }
        Err(PortainerError::StackAlreadyExists(name)) => {
            warn!("Skipping the stack creation, stack {} already exists", name);
            Ok(Outcome::Skipped(name))
        }
        Err(e) => Err(e),
    }
}

/// Run `deleteStack`
pub async fn delete_stack<T: Transport>(
    client: &PortainerClient<T>,
    options: &DeleteStackOptions,
) -> Result<Outcome, PortainerError> {
    info!("Deleting stack {}", options.name);

    let deleted = client.delete_stack(&options.name).await?;
    info!("Stack {} has been successfully deleted", deleted.name);
    Ok(Outcome::Deleted(deleted))
}
