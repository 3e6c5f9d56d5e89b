//! Config command implementation.
//!
//! Reads and edits JSON configuration files by dotted key.

use crate::error::CliError;
use crate::utils::{parse_value, GlobalOptions};
use clap::{Args, Subcommand};
use filehandle::config::JsonStore;

/// Read or edit a JSON configuration file.
#[derive(Args)]
pub struct ConfigCommand {
    /// The JSON file to operate on
    #[arg(long, short, value_name = "FILE")]
    pub file: String,

    /// Apply overrides from environment variables with this prefix
    /// (`PREFIX_SECTION__KEY=value`) before reading
    #[arg(long, value_name = "PREFIX")]
    pub env_prefix: Option<String>,

    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config operations.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the value at a dotted key (or the whole document)
    Get {
        /// Dotted key such as `server.port`
        key: Option<String>,
    },

    /// Store a value at a dotted key; values that parse as JSON are stored
    /// as JSON, anything else as a string
    Set {
        /// Dotted key such as `server.port`
        key: String,
        /// Value to store
        value: String,
    },

    /// Remove a dotted key
    Unset {
        /// Dotted key such as `server.port`
        key: String,
    },
}

impl ConfigCommand {
    /// Execute the config command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let handle = global.handle(&self.file);
        let mut store = JsonStore::open(handle);
        if let Some(prefix) = &self.env_prefix {
            store
                .apply_env_overrides(prefix)
                .map_err(|e| CliError::Config(e.to_string()))?;
        }

        match self.action {
            ConfigAction::Get { key } => {
                let value = match key.as_deref() {
                    Some(key) => store.get(key).ok_or_else(|| {
                        CliError::SemanticFailure(format!("Key not set: {key}"))
                    })?,
                    None => store.data(),
                };
                match value {
                    serde_json::Value::String(text) => println!("{text}"),
                    other => println!("{}", serde_json::to_string_pretty(other)?),
                }
            }
            ConfigAction::Set { key, value } => {
                store
                    .set(&key, parse_value(&value))
                    .map_err(|e| CliError::Config(e.to_string()))?;
                store.save()?;
            }
            ConfigAction::Unset { key } => {
                if store.remove(&key).is_none() {
                    return Err(CliError::SemanticFailure(format!("Key not set: {key}")));
                }
                store.save()?;
            }
        }
        Ok(())
    }
}
