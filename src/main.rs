//! fsmc - FSM specification compiler
//!
//! Converts between Mermaid diagrams and structured YAML FSM specs, and chains
//! several specs into one.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::InputFormat;
use config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fsmc")]
#[command(about = "Compiler for finite state machine specifications")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, env = "FSMC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a spec file and print it in another format
    Convert {
        /// Spec file (Mermaid diagram or YAML spec)
        file: PathBuf,

        /// Label for the resulting spec
        #[arg(short, long)]
        label: String,

        /// How to read the input file
        #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
        in_type: InputFormat,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Chain several spec files, in order, into one spec
    Chain {
        /// Spec files in execution order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Label for the chained spec
        #[arg(short, long)]
        label: String,

        /// How to read the input files
        #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
        in_type: InputFormat,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Check that a spec only references declared states
    Validate {
        /// Spec file (Mermaid diagram or YAML spec)
        file: PathBuf,

        /// How to read the input file
        #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
        in_type: InputFormat,
    },
}

fn main() {
    // Logs go to stderr so rendered output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    };
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match commands::execute(cli.command, &config) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    }
}
