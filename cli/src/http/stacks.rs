//! Stack API client

use http::StatusCode;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::PortainerError;
use crate::http::client::{status_error, PortainerClient};
use crate::http::transport::{ApiRequest, Transport};
use crate::models::lifecycle::{StackEvent, StackLifecycle};
use crate::models::stack::{decode_stack_entry, entry_name, json_kind};
use crate::models::Stack;
use crate::utils::redact_url;

fn observe(lifecycle: &mut StackLifecycle, event: StackEvent) -> Result<(), PortainerError> {
    let state = lifecycle.process(event)?;
    debug!("Stack {} is now {:?}", lifecycle.name(), state);
    Ok(())
}

impl<T: Transport> PortainerClient<T> {
    /// List all stacks visible to the API key, as raw JSON entries
    pub async fn list_stacks(&self) -> Result<Vec<Value>, PortainerError> {
        match self.send_json(ApiRequest::get("/stacks")).await? {
            Value::Array(stacks) => Ok(stacks),
            other => Err(PortainerError::decode(
                "stack list",
                format!("expected an array, found {}", json_kind(&other)),
            )),
        }
    }

    /// Find the first stack whose name matches exactly.
    ///
    /// `Ok(None)` means the listing succeeded and had no such name. A match
    /// that cannot be decoded is an error, not an absence.
    pub async fn find_stack_by_name(&self, name: &str) -> Result<Option<Stack>, PortainerError> {
        let stacks = self.list_stacks().await?;

        match stacks.into_iter().find(|entry| entry_name(entry) == Some(name)) {
            Some(entry) => decode_stack_entry(entry).map(Some),
            None => {
                debug!("No stack named {}", name);
                Ok(None)
            }
        }
    }

    /// Check whether a stack id resolves on the server
    pub async fn stack_exists(&self, id: u64) -> Result<bool, PortainerError> {
        let response = self
            .transport()
            .execute(ApiRequest::get(format!("/stack/{}", id)))
            .await?;

        match response.status {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(status_error(&response)),
        }
    }

    /// Create a stack from a Git repository.
    ///
    /// Fails with [`PortainerError::StackAlreadyExists`] before any write
    /// when the name is taken. Returns the submitted stack, with its id when
    /// the server echoed one back.
    pub async fn create_stack(&self, stack: Stack) -> Result<Stack, PortainerError> {
        let mut lifecycle = StackLifecycle::new(&stack.name);

        if self.find_stack_by_name(&stack.name).await?.is_some() {
            observe(&mut lifecycle, StackEvent::Found)?;
            return Err(PortainerError::StackAlreadyExists(stack.name));
        }
        observe(&mut lifecycle, StackEvent::NotFound)?;

        let path = format!(
            "/stacks/create/swarm/repository?endpointId={}",
            stack.endpoint_id
        );
        info!(
            "Creating stack {} from {} ({}) on endpoint {}",
            stack.name,
            redact_url(&stack.repository_url),
            stack.repository_reference_name,
            stack.endpoint_id
        );

        let body = serde_json::to_value(&stack)?;
        let response = self.send(ApiRequest::post(path, body)).await?;
        observe(&mut lifecycle, StackEvent::Create)?;

        let mut created = stack;
        created.id = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|body| body.get("Id").and_then(Value::as_u64));
        Ok(created)
    }

    /// Delete a stack by name.
    ///
    /// Fails with [`PortainerError::StackNotFound`] before any write when no
    /// stack has that name. Returns the stack as it was on the server.
    pub async fn delete_stack(&self, name: &str) -> Result<Stack, PortainerError> {
        let mut lifecycle = StackLifecycle::new(name);

        let stack = match self.find_stack_by_name(name).await? {
            Some(stack) => stack,
            None => {
                observe(&mut lifecycle, StackEvent::NotFound)?;
                return Err(PortainerError::StackNotFound(name.to_string()));
            }
        };
        observe(&mut lifecycle, StackEvent::Found)?;

        let id = stack
            .id
            .ok_or_else(|| PortainerError::decode(format!("stack {}", name), "missing Id"))?;
        let path = format!("/stacks/{}?endpointId={}", id, stack.endpoint_id);
        info!("Deleting stack {} (id {}) on endpoint {}", name, id, stack.endpoint_id);

        self.send(ApiRequest::delete(path)).await?;
        observe(&mut lifecycle, StackEvent::Delete)?;

        Ok(stack)
    }
}
