//! WGForge CLI binary entrypoint.
//!
//! This is the main entry point for the `wgforge` command-line tool.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use forge_cli::cli::{Cli, Commands};
use forge_cli::commands::{GenerateCommand, PreviewCommand, SeedCommand};

fn main() -> ExitCode {
    // Diagnostics go to stderr so stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Generate(args) => GenerateCommand::execute(&mut stdout, &args)?,
        Commands::Preview(args) => PreviewCommand::execute(&mut stdout, &args)?,
        Commands::Seed(args) => SeedCommand::execute(&mut stdout, &args)?,
    }
    Ok(())
}
