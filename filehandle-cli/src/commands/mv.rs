//! Move command implementation.

use crate::error::CliError;
use crate::utils::{ensure, require_exists, GlobalOptions};
use clap::Args;

/// Move or rename a file or directory.
#[derive(Args)]
pub struct MvCommand {
    /// Source path
    pub source: String,

    /// Destination path
    pub dest: String,

    /// Create missing parent directories of the destination
    #[arg(long, short)]
    pub parents: bool,

    /// Let the backend replace an existing destination
    #[arg(long)]
    pub overwrite: bool,
}

impl MvCommand {
    /// Execute the move command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let source = global.handle(&self.source);
        let dest = global.handle(&self.dest);
        require_exists(&source)?;

        ensure(source.rename_to(&dest, self.overwrite, self.parents), || {
            format!("Could not move {source} to {dest}")
        })
    }
}
