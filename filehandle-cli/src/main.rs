//! Main entry point for the fh CLI.
//!
//! This is the command-line interface for the filehandle library. Every
//! command resolves its paths against the working directory (or `--base`)
//! and acts on the host filesystem through file handles:
//! - `walk`, `info`, `cat`: inspect trees and files
//! - `write`, `mkdir`: create content
//! - `cp`, `mv`, `rm`, `clear`: bulk operations
//! - `config`: edit JSON configuration files

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _level = filehandle::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        base: cli.base,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Walk(cmd) => cmd.execute(&global),
        cli::Command::Info(cmd) => cmd.execute(&global),
        cli::Command::Cat(cmd) => cmd.execute(&global),
        cli::Command::Write(cmd) => cmd.execute(&global),
        cli::Command::Cp(cmd) => cmd.execute(&global),
        cli::Command::Mv(cmd) => cmd.execute(&global),
        cli::Command::Rm(cmd) => cmd.execute(&global),
        cli::Command::Clear(cmd) => cmd.execute(&global),
        cli::Command::Mkdir(cmd) => cmd.execute(&global),
        cli::Command::Config(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
