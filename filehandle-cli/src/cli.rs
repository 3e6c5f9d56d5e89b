//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CatCommand, ClearCommand, CompletionsCommand, ConfigCommand, CpCommand, InfoCommand,
    MkdirCommand, MvCommand, RmCommand, WalkCommand, WriteCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line front end for path-addressed file handles.
#[derive(Parser)]
#[command(name = "fh")]
#[command(version, about = "Inspect and manipulate files through file handles", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Resolve relative paths against this directory instead of the
    /// working directory
    #[arg(long, value_name = "PATH", global = true, env = "FILEHANDLE_BASE")]
    pub base: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// List a tree depth-first, parents before children
    Walk(WalkCommand),

    /// Show metadata for a path
    Info(InfoCommand),

    /// Print file contents
    Cat(CatCommand),

    /// Write or append text to a file
    Write(WriteCommand),

    /// Copy a file or directory
    Cp(CpCommand),

    /// Move or rename a file or directory
    Mv(MvCommand),

    /// Delete files or directories
    Rm(RmCommand),

    /// Empty a directory or truncate a file
    Clear(ClearCommand),

    /// Create directories
    Mkdir(MkdirCommand),

    /// Read or edit a JSON configuration file
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
