use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_url: String,
    pub level: String,
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./expenses.db?mode=rwc".to_string(),
            level: "info".to_string(),
            log_file: "expense_tracker.log".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "expense_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override database URL (e.g. sqlite:./expenses.db?mode=rwc).
    #[arg(long)]
    database_url: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    level: Option<String>,
    /// Override the file logs are written to.
    #[arg(long)]
    log_file: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("EXPENSE_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(database_url) = args.database_url {
        settings.database_url = database_url;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }

    Ok(settings)
}
