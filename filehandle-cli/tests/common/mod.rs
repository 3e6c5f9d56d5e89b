//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with a temporary base directory
//! - Command builder helpers for common patterns
//! - File fixtures

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment rooted at a temporary directory.
///
/// Commands built by [`TestEnv::command`] pass the directory as `--base`, so
/// tests can use short relative paths.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// Environment variables that would change behavior are cleared.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("fh").expect("Failed to find fh binary");
        cmd.env_remove("FILEHANDLE_BASE")
            .env_remove("FILEHANDLE_LOG_MODE");
        cmd
    }

    /// Get a command builder with `--base` set to the temp directory.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--base").arg(&self.temp_path);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Absolute path of a relative name inside the environment.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.temp_path.join(relative)
    }

    /// Create a subdirectory (and parents) in the test environment.
    pub fn create_dir(&self, relative: &str) -> PathBuf {
        let path = self.join(relative);
        std::fs::create_dir_all(&path).expect("Failed to create test directory");
        path
    }

    /// Create a file (and parent directories) with `contents`.
    pub fn create_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Read a file inside the environment.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.join(relative)).expect("Failed to read test file")
    }

    /// Seed `tree/{a.txt, sub/b.txt}`.
    pub fn sample_tree(&self) -> PathBuf {
        self.create_file("tree/a.txt", "alpha");
        self.create_file("tree/sub/b.txt", "beta");
        self.join("tree")
    }

    /// Run `fh walk` on `relative` and return the printed paths.
    pub fn walk(&self, relative: &str) -> Vec<String> {
        let output = self
            .command()
            .arg("walk")
            .arg(relative)
            .output()
            .expect("Failed to run walk command");
        assert!(
            output.status.success(),
            "Walk failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
