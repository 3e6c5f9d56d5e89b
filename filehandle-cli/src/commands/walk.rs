//! Walk command implementation.
//!
//! Prints every entry of a tree in pre-order, one path per line.

use crate::error::CliError;
use crate::utils::{require_exists, GlobalOptions};
use clap::Args;
use std::io::{self, Write};

/// List a tree depth-first, parents before children.
#[derive(Args)]
pub struct WalkCommand {
    /// Root of the walk
    #[arg(default_value = ".")]
    pub path: String,

    /// Print only regular files
    #[arg(long)]
    pub files_only: bool,

    /// Skip hidden entries (but still descend into hidden directories)
    #[arg(long)]
    pub no_hidden: bool,
}

impl WalkCommand {
    /// Execute the walk command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let root = global.handle(&self.path);
        require_exists(&root)?;

        let mut stdout = io::stdout().lock();
        for entry in root.walk() {
            if self.no_hidden && entry.is_hidden() {
                continue;
            }
            if self.files_only && !entry.is_file() {
                continue;
            }
            writeln!(stdout, "{entry}")?;
        }
        Ok(())
    }
}
