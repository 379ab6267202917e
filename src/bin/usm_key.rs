//! usm-key: SNMPv3 USM key derivation and KeyChange tool.
//!
//! Part of the usm-keytools CLI utilities.

use std::process::ExitCode;

use clap::Parser;
use usm_keytools::cli::args::OutputArgs;
use usm_keytools::cli::command::Command;

/// Derive USM keys and encode or decode KeyChange strings.
#[derive(Debug, Parser)]
#[command(name = "usm-key", version, about)]
struct Args {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    args.output.init_tracing();

    match args.command.run() {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
