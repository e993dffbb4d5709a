//! Easel CLI - headless front end for the editor core.
//!
//! Loads documents through the same plugin host and hook pipeline an
//! interactive shell uses, with an off-screen surface standing in for the
//! canvas.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use easel_config::{Config, ResolvedConfig};
use easel_core::Size;

mod commands;
mod headless;

use commands::{config, fit, info, normalize};

/// Easel - scene editor core
#[derive(Parser)]
#[command(name = "easel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Use this config file instead of the layered user and project files
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a document: size, object count and kinds
    Info {
        /// Document file (JSON)
        document: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fit a document into a container and report zoom and clip
    Fit {
        /// Document file (JSON)
        document: PathBuf,
        /// Container size as WIDTHxHEIGHT (e.g. 1280x720)
        #[arg(long, value_parser = fit::parse_container)]
        container: Size,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load a document through the hook pipeline and save it canonically
    Normalize {
        /// Document file (JSON)
        document: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep only what lies on the workspace
        #[arg(long)]
        clip: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved configuration with source annotations
    Show {
        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: String,
        /// Show only a specific section (e.g. viewport, guides, history)
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Validate the current configuration
    Validate,
    /// Show config file paths being checked
    Paths,
}

/// Load the explicit config file, or the layered chain from the current
/// directory.
fn load_config(path: Option<&Path>) -> Result<ResolvedConfig> {
    if let Some(path) = path {
        let config = Config::load_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        return Ok(ResolvedConfig::unlayered(config));
    }
    let workspace_root = std::env::current_dir().ok();
    Ok(Config::load(workspace_root.as_deref())?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref());

    // Set up logging from config, with --log-level override.
    let mut log_config = match &loaded {
        Ok(resolved) => easel_telemetry::LogConfig::from(&resolved.config.logging),
        Err(_) => easel_telemetry::LogConfig::new("warn"),
    };
    if let Some(level) = &cli.log_level {
        level.clone_into(&mut log_config.level);
    }
    if let Err(e) = easel_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    // Validation reports load failures itself.
    if let Commands::Config {
        command: ConfigCommands::Validate,
    } = &cli.command
    {
        return config::validate_config(loaded);
    }

    let resolved = match loaded {
        Ok(resolved) => resolved,
        // An explicit file must load; the layered chain falls back to defaults.
        Err(e) if cli.config.is_some() => return Err(e),
        Err(e) => {
            tracing::warn!(error = %e, "Config failed to load, using defaults");
            ResolvedConfig::unlayered(Config::default())
        },
    };
    let settings = easel_editor::config_bridge::from_config(&resolved.config);

    match cli.command {
        Commands::Info { document, json } => {
            info::run_info(&document, json).await?;
        },
        Commands::Fit {
            document,
            container,
            json,
        } => {
            fit::run_fit(&document, container, settings, json).await?;
        },
        Commands::Normalize {
            document,
            output,
            clip,
        } => {
            normalize::run_normalize(&document, output.as_deref(), settings, clip).await?;
        },
        Commands::Config { command } => {
            handle_config(command, &resolved)?;
        },
    }

    Ok(())
}

fn handle_config(command: ConfigCommands, resolved: &ResolvedConfig) -> Result<()> {
    match command {
        ConfigCommands::Show { format, section } => {
            config::show_config(resolved, &format, section.as_deref())
        },
        ConfigCommands::Validate => Ok(()),
        ConfigCommands::Paths => config::show_paths(),
    }
}
