mod app;
mod config;
mod controller;
mod error;
mod ui;

use std::{fs::OpenOptions, sync::Mutex};

use migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;

use crate::{config::AppConfig, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;

    let database = open_database(&config.database_url).await?;
    let engine = engine::Engine::builder().database(database).build().await?;
    tracing::info!(database = %config.database_url, "expense store ready");

    let mut app = app::App::new(engine, || chrono::Local::now().date_naive());
    app.run().await?;
    Ok(())
}

/// Logs go to a file: stdout belongs to the terminal UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    let filter = EnvFilter::try_new(format!(
        "expense_tui={level},engine={level}",
        level = config.level
    ))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn open_database(url: &str) -> Result<sea_orm::DatabaseConnection> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
