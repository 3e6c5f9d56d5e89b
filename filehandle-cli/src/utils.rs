//! Utility functions for CLI operations.
//!
//! This module provides the global options shared by every command and the
//! helpers that turn command-line paths into handles on the host filesystem.

use crate::error::CliError;
use filehandle::blocking::Handle;
use filehandle::path::{default_base, normalize};
use filehandle::OsBackend;
use std::path::PathBuf;
use std::sync::Arc;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)] // verbose/quiet are consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Directory that relative paths resolve against.
    pub base: Option<PathBuf>,
}

impl GlobalOptions {
    /// The base segments relative paths resolve against.
    ///
    /// A relative `--base` is itself resolved against the working directory.
    pub fn base_segments(&self) -> Vec<String> {
        match &self.base {
            Some(base) => normalize(&base.to_string_lossy(), default_base()),
            None => default_base().to_vec(),
        }
    }

    /// A handle on the host filesystem for a command-line path.
    pub fn handle(&self, raw: &str) -> Handle {
        Handle::resolve(raw, &self.base_segments(), Arc::new(OsBackend::new()))
    }
}

/// Turn a `false` from a handle operation into a semantic failure.
pub fn ensure(succeeded: bool, what: impl FnOnce() -> String) -> Result<(), CliError> {
    if succeeded {
        Ok(())
    } else {
        Err(CliError::SemanticFailure(what()))
    }
}

/// Require that `handle` exists.
pub fn require_exists(handle: &Handle) -> Result<(), CliError> {
    ensure(handle.exists(), || format!("No such file or directory: {handle}"))
}

/// Parse a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

/// Format a byte count for humans using binary units.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
