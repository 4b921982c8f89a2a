use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use helpdesk_core::{DatabaseConfig, NoopHooks};
use helpdesk_storage::Migrator;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "helpdesk-migrate")]
#[command(about = "Apply and revert helpdesk PostgreSQL schema migrations", long_about = None)]
struct Cli {
    /// PostgreSQL connection string; defaults to DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Up,
    /// Revert the most recently applied migrations
    Down {
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        step: u32,
    },
    /// Show which migrations have been applied
    Status {
        #[arg(long)]
        json: bool,
    },
}

async fn open_migrator(database_url: Option<String>) -> Result<Migrator> {
    let config = DatabaseConfig::from_env_with_url(database_url)?;
    tracing::debug!(?config, "database configuration");
    let pool = helpdesk_storage::connect(&config).await?;
    Ok(Migrator::new(pool, Arc::new(NoopHooks)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let migrator = open_migrator(cli.database_url).await?;

    match cli.command {
        Commands::Up => commands::up::run(&migrator).await?,
        Commands::Down { step } => commands::down::run(&migrator, step).await?,
        Commands::Status { json } => commands::status::run(&migrator, json).await?,
    }

    Ok(())
}
