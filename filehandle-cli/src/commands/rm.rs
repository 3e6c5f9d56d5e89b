//! Remove command implementation.

use crate::error::CliError;
use crate::utils::{ensure, GlobalOptions};
use clap::Args;

/// Delete files or directories.
#[derive(Args)]
pub struct RmCommand {
    /// Paths to delete
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Delete directories and their contents
    #[arg(long, short)]
    pub recursive: bool,

    /// Ignore paths that do not exist
    #[arg(long, short)]
    pub force: bool,
}

impl RmCommand {
    /// Execute the remove command.
    ///
    /// Every path is attempted; the command fails if any of them failed.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut failed = Vec::new();
        for raw in &self.paths {
            let handle = global.handle(raw);
            if self.force && !handle.exists() && !handle.is_symlink() {
                continue;
            }
            if !handle.delete(self.recursive) {
                failed.push(handle.full_path());
            }
        }
        ensure(failed.is_empty(), || {
            format!("Could not delete: {}", failed.join(", "))
        })
    }
}
