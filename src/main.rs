use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use crdb_migrate::config::{Config, DatabaseArgs};
use crdb_migrate::migrate::{self, Action};

#[derive(Parser, Debug)]
#[command(
    name = "crdb-migrate",
    version,
    about = "CockroachDB schema migration commands"
)]
struct Cli {
    /// Config file (YAML); absent means environment variables and defaults
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run database migrations ("up" applies pending, "down" reverts one)
    Migrate {
        /// Migration direction; defaults to "up"
        #[arg(value_name = "ACTION")]
        action: Option<String>,

        #[command(flatten)]
        database: DatabaseArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Migrate { action, database } => {
            println!("running database migrations");

            // Reject bad tokens before configuration or connections exist.
            let action: Action = action.as_deref().unwrap_or("up").parse()?;

            let config = Config::load(cli.config.as_deref(), &database)?;
            info!(action = %action, "configuration loaded");

            migrate::run(action, &config).await?;
            println!("success");
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();
}
