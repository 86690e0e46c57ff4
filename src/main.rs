mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::connection::{self, ConnectionArgs};
use crate::cmd::create::{self, CreateArgs};
use crate::cmd::fetch::{self, FetchArgs};
use crate::cmd::start::{self, StartArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::git::GitCli;
use crate::infra::github::GhCli;
use crate::infra::jira::JiraClient;

#[derive(Parser)]
#[command(name = "workon", author, version, about = "Jira ticket workflow CLI")]
struct Cli {
    /// Log debug diagnostics to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a ticket, check out its branch and mark it in progress.
    Start(StartArgs),
    /// Print ticket details.
    Fetch(FetchArgs),
    /// Create a ticket, then its branch and pull request.
    Create(CreateArgs),
    /// Check credentials against the Jira API.
    TestConnection(ConnectionArgs),
    /// Manage Jira profiles.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli.command).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(command: Commands) -> AppResult<()> {
    let cwd = std::env::current_dir()?;

    match command {
        Commands::Config(args) => config_cmd::run(args.command, &cwd),
        Commands::Start(args) => {
            let context = connect(&cwd, args.profile.as_deref())?;
            start::run(&context, args).await
        }
        Commands::Fetch(args) => {
            let context = connect(&cwd, args.profile.as_deref())?;
            fetch::run(&context, args).await
        }
        Commands::Create(args) => {
            let context = connect(&cwd, args.profile.as_deref())?;
            create::run(&context, args).await
        }
        Commands::TestConnection(args) => {
            let context = connect(&cwd, args.profile.as_deref())?;
            connection::run(&context).await
        }
    }
}

fn connect(cwd: &Path, profile: Option<&str>) -> AppResult<AppContext> {
    if let Some(profile) = profile {
        println!("Using profile: {profile}");
    }
    let config = AppConfig::load(cwd, profile)?;
    debug!(
        profile = ?config.profile,
        source = ?config.source,
        url = %config.credentials.url,
        "resolved Jira credentials"
    );

    let git = Arc::new(GitCli::new(config.workspace_root.clone()));
    let gh = Arc::new(GhCli::new(config.workspace_root.clone()));
    let issue_tracker = Arc::new(
        JiraClient::new(&config.credentials).with_credentials_hint(config.credentials_hint()),
    );

    Ok(AppContext::new(config, git, issue_tracker, gh))
}
