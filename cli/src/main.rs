//! Survey Intake CLI
//!
//! Command-line front end for the survey intake engine.
//!
//! # Usage
//!
//! ```bash
//! survey surveys list
//! survey surveys submit -f draft.json --zips assets/zipcodes.json
//! survey surveys submit -f changes.json --id 5
//! survey zip lookup 22030 --zips assets/zipcodes.json
//! survey --format json surveys get 5
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "survey")]
#[command(version)]
#[command(about = "Survey intake command line interface", long_about = None)]
struct Cli {
    /// Record store base URL (overrides config and SURVEY_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    /// Debug logging (RUST_LOG still wins when set)
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage stored surveys
    Surveys {
        #[command(subcommand)]
        action: SurveyCommands,
    },
    /// Query the ZIP reference dataset
    Zip {
        #[command(subcommand)]
        action: ZipCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum SurveyCommands {
    /// List all surveys
    List,
    /// Get survey details
    Get { id: u64 },
    /// Delete a survey
    Delete { id: u64 },
    /// Count stored surveys
    Count,
    /// Fill the intake form from a draft file and submit it
    Submit {
        /// Draft JSON (camelCase field names, raw values)
        #[arg(short, long)]
        file: PathBuf,
        /// Edit this stored survey instead of creating one
        #[arg(long)]
        id: Option<u64>,
        /// ZIP reference dataset used for city/state auto-fill
        #[arg(long)]
        zips: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ZipCommands {
    /// Resolve a ZIP code to city and state
    Lookup {
        zip: String,
        #[arg(long)]
        zips: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let profile = cli.profile.as_deref();
    let config = config::Config::load(profile).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config");
        config::Config::default()
    });

    let format = cli
        .format
        .or_else(|| config.default_format())
        .unwrap_or(output::OutputFormat::Table);
    let ctx = commands::Context::new(config.sync_config(cli.api_url.as_deref()), format);

    let result = match cli.command {
        Commands::Surveys { action } => commands::surveys::handle(action, &ctx).await,
        Commands::Zip { action } => commands::zip::handle(action, &ctx).await,
        Commands::Config { action } => commands::config::handle(action, profile).await,
    };

    if let Err(e) = result {
        output::error(&e);
        std::process::exit(1);
    }
}
