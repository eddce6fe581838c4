//! API models

use serde::{Deserialize, Serialize};

/// A stack as submitted to `POST /stacks/create/swarm/repository`
///
/// The same record is used locally once a stack has been read back from the
/// server, with `id` populated from server state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stack {
    /// Server-assigned identifier, absent until read back
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    pub name: String,

    #[serde(rename = "repositoryURL")]
    pub repository_url: String,

    pub repository_reference_name: String,

    pub repository_username: String,

    pub repository_password: String,

    pub repository_authentication: bool,

    /// Compose file path inside the repository
    pub compose_file: String,

    pub additional_files: Vec<String>,

    pub from_app_template: bool,

    /// Target endpoint (Docker host or Swarm cluster)
    #[serde(rename = "EndpointId")]
    pub endpoint_id: u64,

    #[serde(rename = "swarmID")]
    pub swarm_id: String,

    /// Skip TLS verification when the server fetches the repository
    #[serde(rename = "tlsskipVerify")]
    pub tls_skip_verify: bool,

    #[serde(rename = "Env")]
    pub env: Vec<StackEnv>,

    #[serde(rename = "AutoUpdate")]
    pub auto_update: AutoUpdate,
}

impl Stack {
    /// Build an environment list from key/value pairs.
    ///
    /// A key given more than once keeps its first position and takes the
    /// last value.
    pub fn env_from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Vec<StackEnv>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut env: Vec<StackEnv> = Vec::new();
        for (name, value) in pairs {
            let name = name.into();
            let value = value.into();
            match env.iter_mut().find(|entry| entry.name == name) {
                Some(existing) => existing.value = value,
                None => env.push(StackEnv { name, value }),
            }
        }
        env
    }
}

impl From<StackEntry> for Stack {
    fn from(entry: StackEntry) -> Self {
        let mut stack = Stack {
            id: entry.id,
            name: entry.name,
            endpoint_id: entry.endpoint_id,
            swarm_id: entry.swarm_id.unwrap_or_default(),
            env: entry.env.unwrap_or_default(),
            additional_files: entry.additional_files.unwrap_or_default(),
            auto_update: entry.auto_update.unwrap_or_default(),
            ..Default::default()
        };

        if let Some(git) = entry.git_config {
            stack.repository_url = git.url;
            stack.repository_reference_name = git.reference_name;
            stack.compose_file = git.config_file_path;
            stack.tls_skip_verify = git.tls_skip_verify;
        }

        stack
    }
}

/// Environment variable passed to the stack's services
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEnv {
    pub name: String,
    pub value: String,
}

/// Auto-update policy controlling periodic redeployment from Git
///
/// Accepts both the camelCase keys of the create payload and the PascalCase
/// keys the server uses when listing stacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoUpdate {
    #[serde(alias = "ForcePullImage")]
    pub force_pull_image: bool,

    #[serde(alias = "ForceUpdate")]
    pub force_update: bool,

    /// Polling interval, e.g. `5m`
    #[serde(alias = "Interval")]
    pub interval: String,

    #[serde(rename = "jobID", alias = "JobID")]
    pub job_id: String,

    #[serde(alias = "Webhook")]
    pub webhook: String,
}

/// A stack entry as returned by `GET /stacks`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackEntry {
    #[serde(default)]
    pub id: Option<u64>,

    pub name: String,

    pub endpoint_id: u64,

    #[serde(default)]
    pub swarm_id: Option<String>,

    #[serde(default)]
    pub git_config: Option<GitConfig>,

    #[serde(default)]
    pub env: Option<Vec<StackEnv>>,

    #[serde(default)]
    pub additional_files: Option<Vec<String>>,

    #[serde(default)]
    pub auto_update: Option<AutoUpdate>,
}

/// Git source of a stack, as reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "ReferenceName", default)]
    pub reference_name: String,

    #[serde(rename = "ConfigFilePath", default)]
    pub config_file_path: String,

    #[serde(rename = "TLSSkipVerify", default)]
    pub tls_skip_verify: bool,
}

/// Error envelope returned by Portainer on failed requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub message: String,
    pub details: String,
}
