mod bootstrap;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stockroom_core::{AppConfig, CONFIG_PATH_ENV, Role};
use stockroom_store::Store;
use stockroom_web::{AppState, StockroomServer};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stockroom", version, about = "Stockroom inventory server")]
struct Cli {
    /// Path to stockroom.toml. Defaults to ./stockroom.toml when present.
    #[arg(long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server (default).
    Serve,

    /// Create a user account.
    AddUser {
        username: String,

        /// Administrator, Manager or "Standard User"
        #[arg(long, value_parser = parse_role)]
        role: Role,

        #[arg(long, env = "STOCKROOM_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Delete a user account and its sessions.
    RemoveUser { username: String },

    /// Create a product category.
    AddCategory { name: String },
}

/// Accepts the stored role names, case-insensitively, plus short aliases.
fn parse_role(value: &str) -> Result<Role, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "administrator" | "admin" => Ok(Role::Administrator),
        "manager" => Ok(Role::Manager),
        "standard user" | "standard" | "user" => Ok(Role::StandardUser),
        other => Err(format!(
            "unknown role '{other}' (expected Administrator, Manager or \"Standard User\")"
        )),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    let store = Store::connect(&cfg.database)
        .await
        .with_context(|| format!("connecting to {}", cfg.database.url))?;
    store.migrate().await.context("running migrations")?;

    match cli.cmd.unwrap_or(Command::Serve) {
        Command::Serve => serve(cfg, store).await?,
        Command::AddUser {
            username,
            role,
            password,
        } => {
            let id = store.create_user(&username, &password, &role).await?;
            println!("created user {username} ({role}) with id {id}");
        }
        Command::RemoveUser { username } => {
            if store.delete_user(&username).await? {
                println!("removed user {username}");
            } else {
                anyhow::bail!("no such user: {username}");
            }
        }
        Command::AddCategory { name } => {
            let id = store.create_category(&name).await?;
            println!("created category {name} with id {id}");
        }
    }

    Ok(())
}

async fn serve(cfg: AppConfig, store: Store) -> anyhow::Result<()> {
    let password = bootstrap::admin_password(&cfg.bootstrap);
    bootstrap::bootstrap_admin(&store, &cfg.bootstrap.admin_username, &password).await?;

    tracing::info!(
        database = %cfg.database.url,
        sessions = ?cfg.session.backend,
        "starting stockroom"
    );

    let state = AppState::from_config(&cfg, store);
    StockroomServer::new(cfg.server.clone(), state)
        .run(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
