//! altai CLI - accessibility alt text from vision LLMs.
//!
//! # Usage
//!
//! ```bash
//! # Describe an image with the default provider
//! altai describe https://example.com/chart.png --context "Quarterly report"
//!
//! # Pick a provider and send the image inline
//! altai describe https://example.com/logo.png --provider gemini --transport base64
//!
//! # List providers and the env vars their keys are read from
//! altai providers
//!
//! # View configuration
//! altai config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// altai - generate accessibility alt text with vision LLMs.
#[derive(Parser, Debug)]
#[command(name = "altai")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "ALTAI_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate alt text for one image
    Describe(cli::describe::DescribeArgs),

    /// List supported providers
    Providers,

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = cli::config_path(cli.config.as_deref());

    // Logging isn't initialized yet, so config problems go straight to stderr.
    let config = match cli::load_config(&path, cli.config.is_some()) {
        Ok(config) => config,
        Err(e) if cli.config.is_none() => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `altai config path`."
            );
            altai_core::Config::default()
        }
        Err(e) => return Err(e),
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("altai v{}", altai_core::VERSION);

    match cli.command {
        Commands::Describe(args) => cli::describe::execute(args, &config).await,
        Commands::Providers => cli::providers::execute(),
        Commands::Config(args) => cli::config::execute(args, &path).await,
    }
}
