mod cli;
mod commands;
mod config;

use clap::Parser;
use services::{AppServices, Clock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::config::{Config, prepare_sqlite_file};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing();

    let config = Config::from_args(&cli.global)?;
    // sqlx will not create the database file itself.
    prepare_sqlite_file(&config.db_url)?;
    tracing::debug!(db_url = %config.db_url, "opening database");

    let mut services =
        AppServices::new_sqlite(&config.db_url, Clock::default_clock(), config.options).await?;
    commands::run(cli.command, &mut services).await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
