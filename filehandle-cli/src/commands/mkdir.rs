//! Mkdir command implementation.

use crate::error::CliError;
use crate::utils::{ensure, GlobalOptions};
use clap::Args;

/// Create directories.
#[derive(Args)]
pub struct MkdirCommand {
    /// Directories to create
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Create missing parents and accept existing directories
    #[arg(long, short)]
    pub parents: bool,
}

impl MkdirCommand {
    /// Execute the mkdir command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        for raw in &self.paths {
            let handle = global.handle(raw);
            ensure(handle.mkdir(self.parents), || {
                format!("Could not create directory {handle}")
            })?;
        }
        Ok(())
    }
}
