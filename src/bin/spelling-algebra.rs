//! spelling-algebra - Apply spelling algebra formulas to phonetic dictionaries
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to trace rounds.

use clap::Parser;
use colored::Colorize;
use std::process;

use spelling_algebra::cli::commands;
use spelling_algebra::cli::Cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli.command) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
}
