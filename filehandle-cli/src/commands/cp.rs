//! Copy command implementation.

use crate::error::CliError;
use crate::utils::{ensure, require_exists, GlobalOptions};
use clap::Args;

/// Copy a file or directory.
#[derive(Args)]
pub struct CpCommand {
    /// Source path
    pub source: String,

    /// Destination path
    pub dest: String,

    /// Copy directories with all their contents
    #[arg(long, short)]
    pub recursive: bool,

    /// Write over an existing destination instead of deleting it first
    #[arg(long)]
    pub overwrite: bool,
}

impl CpCommand {
    /// Execute the copy command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let source = global.handle(&self.source);
        let dest = global.handle(&self.dest);
        require_exists(&source)?;

        if self.recursive && source.contains(&dest) {
            return Err(CliError::InvalidArguments(format!(
                "cannot copy {source} into itself"
            )));
        }

        ensure(source.copy_to(&dest, self.overwrite, self.recursive), || {
            format!("Copy of {source} to {dest} did not complete")
        })
    }
}
