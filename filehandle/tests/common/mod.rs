//! Common test utilities for integration tests.
//!
//! This module provides a call-recording backend with fault injection and
//! fixture builders for in-memory and on-disk trees.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use filehandle::backend::{AccessMode, Backend, ByteReader, ByteWriter, MemoryBackend, Metadata};
use filehandle::path::normalize;
use filehandle::Handle;
use parking_lot::Mutex;

/// Render a backend path as `/a/b` regardless of platform separator.
fn display(path: &Path) -> String {
    format!("/{}", normalize(&path.to_string_lossy(), &[]).join("/"))
}

/// A backend that wraps [`MemoryBackend`], records every call as
/// `"<operation> <path>"`, and fails chosen calls on demand.
///
/// It has no native `remove_dir_all`, so recursive deletes
/// exercise the child-by-child fallback.
#[derive(Default)]
pub struct RecordingBackend {
    inner: MemoryBackend,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashSet<(String, String)>>,
}

#[allow(dead_code)]
impl RecordingBackend {
    /// A recording backend over an empty tree.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The wrapped tree, for seeding and inspection without recording.
    pub fn tree(&self) -> &MemoryBackend {
        &self.inner
    }

    /// Make `operation` on `path` fail with `PermissionDenied`.
    pub fn fail_on(&self, operation: &str, path: &str) {
        self.failures
            .lock()
            .insert((operation.to_string(), path.to_string()));
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Calls whose operation is one of `operations`.
    pub fn calls_of(&self, operations: &[&str]) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| {
                call.split_once(' ')
                    .is_some_and(|(op, _)| operations.contains(&op))
            })
            .collect()
    }

    /// Forget recorded calls.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    /// Position of the first call equal to `call`.
    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    fn record(&self, operation: &str, path: &Path) -> io::Result<()> {
        let path = display(path);
        self.calls.lock().push(format!("{operation} {path}"));
        if self
            .failures
            .lock()
            .contains(&(operation.to_string(), path.clone()))
        {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected {operation} failure for {path}"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        self.record("exists", path)?;
        self.inner.exists(path).await
    }

    async fn stat(&self, path: &Path) -> io::Result<Metadata> {
        self.record("stat", path)?;
        self.inner.stat(path).await
    }

    async fn lstat(&self, path: &Path) -> io::Result<Metadata> {
        self.record("lstat", path)?;
        self.inner.lstat(path).await
    }

    async fn access(&self, path: &Path, mode: AccessMode) -> io::Result<bool> {
        self.record("access", path)?;
        self.inner.access(path, mode).await
    }

    async fn set_permissions(&self, path: &Path, mode: u32) -> io::Result<()> {
        self.record("set_permissions", path)?;
        self.inner.set_permissions(path, mode).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        self.record("read_dir", path)?;
        self.inner.read_dir(path).await
    }

    async fn create_dir(&self, path: &Path, recursive: bool) -> io::Result<()> {
        self.record("create_dir", path)?;
        self.inner.create_dir(path, recursive).await
    }

    async fn remove_dir(&self, path: &Path) -> io::Result<()> {
        self.record("remove_dir", path)?;
        self.inner.remove_dir(path).await
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.record("remove_dir_all", path)?;
        Err(filehandle::backend::unsupported("remove_dir_all"))
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.record("remove_file", path)?;
        self.inner.remove_file(path).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.record("rename", from)?;
        self.inner.rename(from, to).await
    }

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.record("read_link", path)?;
        self.inner.read_link(path).await
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.record("read", path)?;
        self.inner.read(path).await
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.record("read_to_string", path)?;
        self.inner.read_to_string(path).await
    }

    async fn write(&self, path: &Path, contents: &[u8], append: bool) -> io::Result<()> {
        self.record("write", path)?;
        self.inner.write(path, contents, append).await
    }

    async fn open_read(&self, path: &Path) -> io::Result<ByteReader> {
        self.record("open_read", path)?;
        self.inner.open_read(path).await
    }

    async fn open_write(&self, path: &Path, append: bool) -> io::Result<ByteWriter> {
        self.record("open_write", path)?;
        self.inner.open_write(path, append).await
    }
}

/// Seed `root/{a.txt, sub/{b.txt}}` and return a handle to `root`.
#[allow(dead_code)]
pub fn sample_tree(backend: &Arc<RecordingBackend>) -> Handle {
    backend.tree().insert_file("/root/a.txt", "alpha").unwrap();
    backend.tree().insert_file("/root/sub/b.txt", "beta").unwrap();
    Handle::resolve("/root", &[], backend.clone())
}

/// A handle at an absolute in-memory path.
#[allow(dead_code)]
pub fn handle(backend: &Arc<RecordingBackend>, path: &str) -> Handle {
    Handle::resolve(path, &[], backend.clone())
}

/// Creates a temporary directory for on-disk tests.
#[allow(dead_code)]
pub fn create_temp_dir() -> io::Result<tempfile::TempDir> {
    tempfile::tempdir()
}
