//! Write command implementation.

use crate::error::CliError;
use crate::utils::{ensure, GlobalOptions};
use clap::Args;
use std::io::{self, Read};

/// Write text to a file, replacing or appending.
#[derive(Args)]
pub struct WriteCommand {
    /// File to write
    pub path: String,

    /// Text to write (read from stdin when omitted)
    pub text: Option<String>,

    /// Append instead of replacing existing contents
    #[arg(long, short)]
    pub append: bool,

    /// Create missing parent directories
    #[arg(long, short)]
    pub parents: bool,
}

impl WriteCommand {
    /// Execute the write command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let handle = global.handle(&self.path);
        let contents = match self.text {
            Some(text) => text.into_bytes(),
            None => {
                let mut buffer = Vec::new();
                io::stdin().lock().read_to_end(&mut buffer)?;
                buffer
            }
        };

        if self.parents {
            if let Some(parent) = handle.parent() {
                ensure(parent.mkdir(true), || {
                    format!("Could not create directory {parent}")
                })?;
            }
        }

        let written = if self.append {
            handle.append(&contents)
        } else {
            handle.write(&contents)
        };
        ensure(written, || format!("Could not write {handle}"))?;
        log::info!("Wrote {} byte(s) to {handle}", contents.len());
        Ok(())
    }
}
