//! portainer-util - Entry Point
//!
//! Creates and deletes Git-backed Swarm stacks on a Portainer server.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use tracing::{debug, error};

use portainer_util::app::options::{
    ConnectionOptions, CreateStackOptions, DeleteStackOptions, DEFAULT_AUTO_UPDATE_INTERVAL,
    DEFAULT_COMPOSE_FILE, DEFAULT_REFERENCE_NAME,
};
use portainer_util::app::run::{create_stack, delete_stack};
use portainer_util::http::client::PortainerClient;
use portainer_util::logs::{init_logging, LogLevel, LogOptions};
use portainer_util::storage::settings::Settings;
use portainer_util::utils::{parse_env_arg, version_info};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

#[derive(Parser)]
#[command(name = "portainer-util")]
#[command(about = "Manage Portainer stacks deployed from Git repositories", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// JSON settings file with connection defaults
    #[arg(long, global = true, env = "PORTAINER_UTIL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Portainer server URL, e.g. https://portainer.example.com:9443
    #[arg(long, global = true, env = "PORTAINER_URL")]
    portainer_url: Option<String>,

    /// Portainer access token
    #[arg(long, global = true, env = "PORTAINER_API_KEY", hide_env_values = true)]
    portainer_api_key: Option<String>,

    /// Endpoint (environment) the stack is deployed onto
    #[arg(long, global = true, env = "PORTAINER_ENDPOINT_ID")]
    endpoint_id: Option<u64>,

    /// Swarm cluster identifier within the endpoint
    #[arg(long, global = true, env = "PORTAINER_SWARM_ID")]
    swarm_id: Option<String>,

    /// Skip TLS certificate verification (--tls-skip-verify=false overrides the settings file)
    #[arg(
        long,
        global = true,
        env = "PORTAINER_TLS_SKIP_VERIFY",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    tls_skip_verify: Option<bool>,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a Portainer stack from a Git repository
    #[command(name = "createStack", alias = "create-stack")]
    CreateStack(CreateStackArgs),

    /// Delete a Portainer stack by name
    #[command(name = "deleteStack", alias = "delete-stack")]
    DeleteStack {
        /// Stack name to be deleted
        #[arg(long)]
        name: String,
    },
}

#[derive(Args)]
struct CreateStackArgs {
    /// Stack name
    #[arg(long)]
    name: String,

    /// Docker compose filename
    #[arg(long, default_value = DEFAULT_COMPOSE_FILE)]
    compose_file: String,

    /// Additional files needed from the repository
    #[arg(long = "additional-files", value_name = "PATH")]
    additional_files: Vec<String>,

    /// Git repository URL to pull docker-compose from
    #[arg(long)]
    repository_url: String,

    /// Git repository reference name, e.g. refs/heads/main
    #[arg(long, default_value = DEFAULT_REFERENCE_NAME)]
    repository_reference_name: String,

    /// Git repository username
    #[arg(long)]
    repository_username: String,

    /// Git repository password
    #[arg(long, env = "REPOSITORY_PASSWORD", hide_env_values = true)]
    repository_password: String,

    /// Environment variables (KEY=VALUE, repeatable; A=1,B=2 sets both)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_env_pairs)]
    env: Vec<EnvPairs>,

    /// Auto-update interval
    #[arg(long, default_value = DEFAULT_AUTO_UPDATE_INTERVAL)]
    auto_update_interval: String,
}

/// Pairs from one `--env` argument
#[derive(Clone, Debug)]
struct EnvPairs(Vec<(String, String)>);

fn parse_env_pairs(s: &str) -> Result<EnvPairs, String> {
    parse_env_arg(s).map(EnvPairs)
}

impl From<ConnectionArgs> for ConnectionOptions {
    fn from(args: ConnectionArgs) -> Self {
        ConnectionOptions {
            portainer_url: args.portainer_url,
            portainer_api_key: args.portainer_api_key,
            endpoint_id: args.endpoint_id,
            swarm_id: args.swarm_id,
            tls_skip_verify: args.tls_skip_verify,
            timeout_secs: args.timeout_secs,
        }
    }
}

impl From<CreateStackArgs> for CreateStackOptions {
    fn from(args: CreateStackArgs) -> Self {
        CreateStackOptions {
            name: args.name,
            compose_file: args.compose_file,
            additional_files: args.additional_files,
            repository_url: args.repository_url,
            repository_reference_name: args.repository_reference_name,
            repository_username: args.repository_username,
            repository_password: SecretString::from(args.repository_password),
            env: args.env.into_iter().flat_map(|pairs| pairs.0).collect(),
            auto_update_interval: args.auto_update_interval,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Logging comes up before any error can be reported, even a settings one
    let loaded = Settings::load_optional(cli.config.as_deref()).await;
    let file_level = loaded.as_ref().ok().and_then(|settings| settings.log_level);

    let log_options = LogOptions {
        log_level: cli.log_level.or(file_level).unwrap_or_default(),
        json_format: cli.log_json,
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }
    let settings = loaded?;
    debug!("portainer-util {}", version_info());

    let config = ConnectionOptions::from(cli.connection).resolve(&settings)?;
    let client = PortainerClient::new(config).context("failed to build the HTTP client")?;

    match cli.command {
        Commands::CreateStack(args) => {
            let options = CreateStackOptions::from(args);
            create_stack(&client, &options)
                .await
                .with_context(|| format!("failed creating the stack {}", options.name))?;
        }
        Commands::DeleteStack { name } => {
            let options = DeleteStackOptions { name };
            delete_stack(&client, &options)
                .await
                .with_context(|| format!("can't delete the stack {}", options.name))?;
        }
    }

    Ok(())
}
