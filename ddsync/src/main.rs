use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ddsync::app::load_applications;
use ddsync::config::SyncConfig;
use ddsync::sync::engine::SyncError;
use ddsync::sync::run_push;
use ddsync_core::{ApiErrorClass, DatadogClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

const AUTH_HINT: &str =
    "Datadog rejected the credentials; check that DD_API_KEY and DD_APP_KEY are valid";

#[derive(Debug, Parser)]
#[command(name = "ddsync", version, about = "Keep Datadog in step with declared applications")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create, update and prune remote resources to match the descriptors
    Push(PushArgs),
}

#[derive(Debug, Args)]
struct PushArgs {
    /// JSON file holding the application descriptors
    apps: PathBuf,
    /// Push only the application whose dashboard title matches, ignoring case; skips pruning
    #[arg(long)]
    name: Option<String>,
    /// Lock file path, overriding DDSYNC_LOCK_FILE
    #[arg(long)]
    lock: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Push(args) => push(args).await,
    }
}

async fn push(args: PushArgs) -> anyhow::Result<()> {
    // Credentials first, so a misconfigured shell fails before touching any file.
    let config = SyncConfig::from_env()?;
    let lock_path = args.lock.unwrap_or_else(|| config.lock_path.clone());
    let apps = load_applications(&args.apps)
        .await
        .with_context(|| format!("loading {}", args.apps.display()))?;
    info!(apps = apps.len(), lock = %lock_path.display(), "loaded descriptors");

    let client = DatadogClient::with_base_url(&config.api_url, &config.api_key, &config.app_key)
        .context("invalid DD_API_URL")?;
    let options = config.sync_options(args.name);
    let stats = run_push(&client, &apps, &options, &lock_path)
        .await
        .map_err(with_hint)?;

    println!("{stats}");
    Ok(())
}

fn with_hint(err: SyncError) -> anyhow::Error {
    let rejected = matches!(
        &err,
        SyncError::Api(api) if api.classification() == Some(ApiErrorClass::Auth)
    );
    let err = anyhow::Error::new(err);
    if rejected { err.context(AUTH_HINT) } else { err }
}
