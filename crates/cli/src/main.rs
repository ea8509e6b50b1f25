//! Ad-Kit CLI.
//!
//! This tool provides commands for:
//! - Generating ad copy through the configured workflow webhook
//! - Normalizing a saved webhook payload offline
//! - Validating and inspecting configuration

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;

use adkit_common::settings::Settings;
use clap::{Parser, Subcommand};

mod config;
mod error;
mod generate;
mod logging;
mod normalize;
mod render;

use error::CliError;
use generate::FormInputs;
use render::OutputFormat;

#[derive(Parser)]
#[command(name = "adkit")]
#[command(about = "Generate ad copy variants through an Ad-Kit webhook")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML configuration file (defaults to the built-in config)
    #[arg(short, long, global = true, env = "ADKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a campaign to the webhook and show the generated copy
    Generate {
        /// Description of the product or service
        #[arg(long, short)]
        item: Option<String>,

        /// Campaign goal: traffic, conversions or retargeting
        #[arg(long, short)]
        goal: Option<String>,

        /// Creative style: clean, ugc or meme
        #[arg(long, short)]
        style: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Normalize a saved webhook payload without calling the webhook
    Normalize {
        /// Payload JSON file (reads stdin when omitted)
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate config and show the effective webhook settings
    Validate {
        /// Path to the TOML configuration file
        #[arg(long, short)]
        file: Option<PathBuf>,
    },

    /// Print the effective config after environment overrides
    Show {
        /// Path to the TOML configuration file
        #[arg(long, short)]
        file: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logger(cli.verbose) {
        eprintln!("Warning: logger unavailable: {}", e);
    }

    match run(cli) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    match cli.command {
        Commands::Generate {
            item,
            goal,
            style,
            format,
        } => {
            let settings = config::load_settings(cli.config.as_deref())?;
            let inputs = FormInputs { item, goal, style };
            generate::generate(&settings, &inputs, format)
        }
        Commands::Normalize { file, format } => {
            let settings: Settings = config::load_settings(cli.config.as_deref())?;
            let payload = normalize::read_payload(file.as_deref())?;
            normalize::normalize_payload(&payload, settings.normalizer.on_unrecognized, format)
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { file } => {
                config::validate(file.or(cli.config).as_deref())
            }
            ConfigAction::Show { file } => config::show(file.or(cli.config).as_deref()),
        },
    }
}
