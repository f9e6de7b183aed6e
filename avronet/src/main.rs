//! `avronet` command-line entry point.

use anyhow::Result;
use avronet::cli::CommandLineInterface;
use clap::Parser;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = CommandLineInterface::parse();
    let output = cli.run(&mut std::io::stdout().lock())?;

    for diagnostic in &output.diagnostics {
        eprintln!("{}", diagnostic);
    }
    if output.cancelled {
        eprintln!("generation cancelled");
    }

    if output.has_errors() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
