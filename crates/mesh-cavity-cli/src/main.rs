//! mesh-cavity CLI - fluid cavity extraction for STL solids.
//!
//! Usage: mesh-cavity [OPTIONS] <COMMAND>
//!
//! Run `mesh-cavity --help` for available commands.

mod commands;
mod config;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use commands::extract::ExtractArgs;
use commands::validate::ValidateArgs;

#[derive(Parser)]
#[command(name = "mesh-cavity")]
#[command(author, version, about = "Extract the fluid cavity of a closed STL solid", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Suppress normal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the solid and its extracted fluid cavity as STL, then audit both
    Extract(ExtractArgs),

    /// Print a quality report for an STL file
    Validate(ValidateArgs),
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract(args) => commands::extract::run(&args, cli.format, cli.quiet),
        Commands::Validate(args) => commands::validate::run(&args, cli.format, cli.quiet),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
