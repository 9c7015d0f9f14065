// FinSight - terminal chat client for the FinSight assistant server

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use finsight_chat::cli::{format_message, ChatRepl};
use finsight_chat::config::{load_config, load_config_from, validate, ClientConfig};
use finsight_chat::{ApiClient, ChatSession, ServerStatus, SubmitOutcome};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "finsight")]
#[command(about = "Chat with the FinSight assistant server", version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Server base URL (overrides config file and FINSIGHT_BASE_URL)
    #[arg(long = "base-url", global = true)]
    base_url: Option<String>,

    /// User id sent with chat requests
    #[arg(long = "user-id", global = true)]
    user_id: Option<String>,

    /// Request timeout in seconds (default: no timeout)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Config file (default: ~/.finsight/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Message to send right after startup (REPL mode)
    #[arg(long = "initial-prompt")]
    initial_prompt: Option<String>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Check whether the server is reachable
    Health,
    /// Show the server's agent information
    Info,
    /// Send a single message and print the reply
    Ask {
        /// Message text
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    match args.command {
        Some(Command::Health) => return run_health(&config).await,
        Some(Command::Info) => return run_info(&config).await,
        Some(Command::Ask { message }) => return run_ask(&config, &message).await,
        None => {}
    }

    // Piped input mode: send stdin as one message
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        if input.trim().is_empty() {
            return Ok(());
        }
        return run_ask(&config, input.trim()).await;
    }

    let session = ChatSession::connect(&config)?;
    ChatRepl::new(session, config.root())
        .run_interactive(args.initial_prompt)
        .await
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Config file and environment first, then command-line flags
fn resolve_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(user_id) = &args.user_id {
        config.user_id = user_id.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout_seconds = Some(timeout);
    }

    validate(&config).context("Invalid command-line settings")?;
    Ok(config)
}

async fn run_health(config: &ClientConfig) -> Result<()> {
    let client = ApiClient::new(config.clone())?;

    match client.health_report().await {
        Ok(report) => {
            let status = report.server_status();
            println!("{}: {}", client.base_url(), status);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if status != ServerStatus::Online {
                bail!("Server reported status {:?}", report.status);
            }
            Ok(())
        }
        Err(e) => {
            println!("{}: {}", client.base_url(), ServerStatus::Offline);
            eprintln!("{}", finsight_chat::errors::connection_refused_error(client.base_url()));
            Err(e.into())
        }
    }
}

async fn run_info(config: &ClientConfig) -> Result<()> {
    let client = ApiClient::new(config.clone())?;
    let info = client
        .get_agent_info()
        .await
        .context("Failed to get agent info")?;
    println!("{}", serde_json::to_string_pretty(info.as_map())?);
    Ok(())
}

async fn run_ask(config: &ClientConfig, message: &str) -> Result<()> {
    let client = Arc::new(ApiClient::new(config.clone())?);
    let session = ChatSession::new(client, config.user_id.clone());

    match session.submit(message).await {
        SubmitOutcome::Replied(_) => {
            let transcript = session.transcript();
            if let Some(reply) = transcript.last() {
                println!("{}", format_message(reply));
            }
            Ok(())
        }
        SubmitOutcome::Failed(e) => {
            let state = session.snapshot();
            if let Some(response) = state.response {
                println!("{}", response);
            }
            Err(e).context("Failed to send message")
        }
        SubmitOutcome::Ignored => Ok(()),
    }
}
