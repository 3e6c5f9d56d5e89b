//! Build script for filehandle-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("fh")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and manipulate files through file handles")
        .long_about(
            "Command-line front end for path-addressed file handles over the host filesystem",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("base")
                .long("base")
                .help("Resolve relative paths against this directory")
                .value_name("PATH")
                .global(true)
                .env("FILEHANDLE_BASE"),
        )
        .subcommands(vec![
            Command::new("walk")
                .about("List a tree depth-first, parents before children")
                .long_about("Print every entry under a path in pre-order, one per line"),
            Command::new("info")
                .about("Show metadata for a path")
                .long_about("Show kind, size, permissions and timestamps, as text or JSON"),
            Command::new("cat")
                .about("Print file contents")
                .long_about("Stream one or more files to standard output"),
            Command::new("write")
                .about("Write or append text to a file")
                .long_about("Replace or append file contents from an argument or stdin"),
            Command::new("cp")
                .about("Copy a file or directory")
                .long_about("Copy a file, or a directory tree with --recursive"),
            Command::new("mv")
                .about("Move or rename a file or directory")
                .long_about("Rename an entry, optionally creating destination parents"),
            Command::new("rm")
                .about("Delete files or directories")
                .long_about("Delete entries, recursing into directories with --recursive"),
            Command::new("clear")
                .about("Empty a directory or truncate a file")
                .long_about("Delete a directory's children or truncate a file, keeping the entry"),
            Command::new("mkdir")
                .about("Create directories")
                .long_about("Create directories, with missing parents when --parents is given"),
            Command::new("config")
                .about("Read or edit a JSON configuration file")
                .long_about("Get, set or unset values in a JSON file by dotted key"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("fh.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
