//! Clear command implementation.

use crate::error::CliError;
use crate::utils::{ensure, require_exists, GlobalOptions};
use clap::Args;

/// Empty a directory, or truncate a file, keeping the entry itself.
#[derive(Args)]
pub struct ClearCommand {
    /// Path to clear
    pub path: String,

    /// Delete non-empty subdirectories too
    #[arg(long, short)]
    pub recursive: bool,
}

impl ClearCommand {
    /// Execute the clear command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let handle = global.handle(&self.path);
        require_exists(&handle)?;
        ensure(handle.clear(self.recursive), || {
            format!("Could not clear everything under {handle}")
        })
    }
}
