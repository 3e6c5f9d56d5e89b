//! Cat command implementation.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use std::io::{self, Write};

/// Print a file's contents to stdout.
#[derive(Args)]
pub struct CatCommand {
    /// Files to print, in order
    #[arg(required = true)]
    pub paths: Vec<String>,
}

impl CatCommand {
    /// Execute the cat command.
    ///
    /// Streams each file through the backend's reader, so large files are
    /// not loaded whole.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut stdout = io::stdout().lock();
        for raw in &self.paths {
            let handle = global.handle(raw);
            if handle.is_directory() {
                return Err(CliError::SemanticFailure(format!(
                    "Is a directory: {handle}"
                )));
            }
            let mut reader = handle.reader()?;
            io::copy(&mut reader, &mut stdout)?;
        }
        stdout.flush()?;
        Ok(())
    }
}
