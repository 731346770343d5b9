// Copyright (c) 2024 Nexus. All rights reserved.

mod cli_messages;
mod config;
mod consts;
mod controller;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod models;
mod monitor;
mod session;
mod snapshot;
mod ui;

use crate::config::{
    Config, ENVIRONMENT_ENV, get_config_path, parse_api_url, resolve_environment,
};
use crate::consts::cli_consts::FETCH_FAILED_MESSAGE;
use crate::environment::Environment;
use crate::monitor::BillingMonitorClient;
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use crate::snapshot::{SnapshotError, fetch_snapshot, render_summary};
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use std::error::Error;
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Live monitor for the billing backend
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the live dashboard
    Start {
        /// Print activity to the console instead of running the dashboard UI
        #[arg(long, action = ArgAction::SetTrue)]
        headless: bool,

        /// Base URL of the billing API, e.g. https://billing.example.com/api
        #[arg(long, value_name = "URL", env = "BILLING_MONITOR_API_URL")]
        api_url: Option<String>,

        /// Paint a solid background behind the dashboard
        #[arg(long = "with-background", action = ArgAction::SetTrue)]
        with_background: bool,
    },
    /// Fetch the dashboard once and print it
    Snapshot {
        /// Day to query instead of the current window
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,

        /// Print the normalized dashboard as JSON
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,

        /// Base URL of the billing API
        #[arg(long, value_name = "URL", env = "BILLING_MONITOR_API_URL")]
        api_url: Option<String>,
    },
    /// Manage the stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Store the base URL of the billing API
    SetApiUrl {
        /// Base URL, e.g. https://billing.example.com/api
        url: String,
    },
    /// Show the stored configuration and the backend it resolves to
    Show,
    /// Delete the stored configuration
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config_path = get_config_path()?;

    match args.command {
        Command::Start {
            headless,
            api_url,
            with_background,
        } => {
            let environment = load_environment(&config_path, api_url.as_deref())?;
            start(environment, headless, with_background).await
        }
        Command::Snapshot {
            date,
            json,
            api_url,
        } => {
            let environment = load_environment(&config_path, api_url.as_deref())?;
            snapshot(environment, date.as_deref(), json).await
        }
        Command::Config { action } => run_config_command(action, &config_path),
    }
}

/// Resolve the backend from the flag, the config file and the environment.
fn load_environment(
    config_path: &Path,
    api_url: Option<&str>,
) -> Result<Environment, Box<dyn Error>> {
    let config = Config::load_or_default(config_path).map_err(|e| {
        format!(
            "Failed to load config {}: {}",
            config_path.display(),
            e
        )
    })?;
    let env_name = std::env::var(ENVIRONMENT_ENV).ok();
    Ok(resolve_environment(api_url, &config, env_name.as_deref())?)
}

/// Starts the live dashboard.
///
/// # Arguments
/// * `environment` - The backend to poll.
/// * `headless` - Print activity to the console instead of running the TUI.
/// * `with_background` - Whether to paint a background in the TUI.
async fn start(
    environment: Environment,
    headless: bool,
    with_background: bool,
) -> Result<(), Box<dyn Error>> {
    let session = setup_session(environment);
    if headless {
        run_headless_mode(session).await
    } else {
        run_tui_mode(session, with_background).await
    }
}

async fn snapshot(
    environment: Environment,
    date: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let client = BillingMonitorClient::new(environment);
    let today = Local::now().date_naive();

    match fetch_snapshot(&client, date, today).await {
        Ok(dashboard) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                print!("{}", render_summary(&dashboard));
            }
            Ok(())
        }
        Err(SnapshotError::Fetch(e)) => {
            print_cmd_error!(FETCH_FAILED_MESSAGE, &e.to_string());
            Err(e.into())
        }
        Err(e) => {
            print_cmd_error!(&e.to_string());
            Err(e.into())
        }
    }
}

fn run_config_command(action: ConfigCommand, config_path: &Path) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigCommand::SetApiUrl { url } => {
            let api_url = parse_api_url(&url)?.api_url();
            let mut config = Config::load_or_default(config_path)?;
            config.api_url = Some(api_url.clone());
            config
                .save(config_path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            print_cmd_success!("Config saved", "API URL set to {}", api_url);
            Ok(())
        }
        ConfigCommand::Show => {
            let config = Config::load_or_default(config_path)?;
            print_cmd_info!("Config file", "{}", config_path.display());
            print_cmd_info!(
                "Stored API URL",
                "{}",
                config.api_url.as_deref().unwrap_or("(not set)")
            );
            let env_name = std::env::var(ENVIRONMENT_ENV).ok();
            let resolved = resolve_environment(None, &config, env_name.as_deref())?;
            print_cmd_info!("Backend", "{}", resolved.api_url());
            Ok(())
        }
        ConfigCommand::Clear => {
            if !config_path.exists() {
                print_cmd_warn!("Nothing to clear", "{} does not exist", config_path.display());
                return Ok(());
            }
            println!("Clearing stored configuration...");
            Config::clear(config_path)?;
            print_cmd_success!("Config cleared", "");
            Ok(())
        }
    }
}
