//! Info command implementation.
//!
//! Shows what the backend reports about a single entry, either as a
//! human-readable listing or as JSON.

use crate::error::CliError;
use crate::utils::{format_size, GlobalOptions};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use filehandle::blocking::Handle;
use filehandle::FileKind;
use serde::Serialize;

/// Show metadata for a path.
#[derive(Args)]
pub struct InfoCommand {
    /// Path to describe
    pub path: String,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Report {
    path: String,
    uri: Option<String>,
    kind: FileKind,
    symlink: bool,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accessed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entries: Option<usize>,
}

fn timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl Report {
    fn gather(handle: &Handle) -> Option<Self> {
        let meta = handle.metadata()?;
        let entries = if meta.is_dir() {
            handle.list_names().map(|names| names.len())
        } else {
            None
        };
        Some(Self {
            path: handle.full_path(),
            uri: handle.uri().map(String::from),
            kind: meta.kind,
            symlink: handle.is_symlink(),
            size: meta.size,
            mode: meta.mode.map(|mode| format!("{mode:04o}")),
            created: meta.created.map(timestamp),
            modified: meta.modified.map(timestamp),
            accessed: meta.accessed.map(timestamp),
            entries,
        })
    }

    fn print_text(&self) {
        println!("Path:     {}", self.path);
        if let Some(uri) = &self.uri {
            println!("URI:      {uri}");
        }
        let kind = match self.kind {
            FileKind::File => "file",
            FileKind::Directory => "directory",
            FileKind::Symlink => "symlink",
            FileKind::Other => "other",
        };
        if self.symlink {
            println!("Kind:     {kind} (via symlink)");
        } else {
            println!("Kind:     {kind}");
        }
        println!("Size:     {}", format_size(self.size));
        if let Some(entries) = self.entries {
            println!("Entries:  {entries}");
        }
        if let Some(mode) = &self.mode {
            println!("Mode:     {mode}");
        }
        for (label, value) in [
            ("Created", &self.created),
            ("Modified", &self.modified),
            ("Accessed", &self.accessed),
        ] {
            if let Some(value) = value {
                println!("{:<10}{value}", format!("{label}:"));
            }
        }
    }
}

impl InfoCommand {
    /// Execute the info command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let handle = global.handle(&self.path);
        let report = Report::gather(&handle).ok_or_else(|| {
            CliError::SemanticFailure(format!("No such file or directory: {handle}"))
        })?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.print_text();
        }
        Ok(())
    }
}
