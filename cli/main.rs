//! swarmnet command-line tool
//!
//! Run with:
//!   cargo run --release -- xor
//!   cargo run --release -- create net.json basic "?:B->SIGMOID->5:B->SIGMOID->?" --input 2 --ideal 1
//!   cargo run --release -- train net.json data.egb --threads 4

mod args;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.options.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match commands::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
