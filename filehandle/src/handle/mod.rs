//! File handles: a canonical path bound to a backend.
//!
//! A [`Handle`] is a cheap value. Cloning it clones the segment list and bumps
//! the backend's reference count; nothing is opened and nothing is cached.
//! Every query goes to the backend fresh.
//!
//! # Failure convention
//!
//! Handle methods never return errors for ordinary filesystem failures.
//! Queries answer `None` when the answer is unknown and actions answer
//! `false` when they did not succeed. The underlying error is logged at
//! `debug` level. The one exception is stream creation ([`Handle::reader`]
//! and [`Handle::writer`]), which returns a [`Result`] so that a backend
//! without byte channels is reported loudly.
//!
//! # Calling conventions
//!
//! [`Handle`] is async; the suspension points are exactly the backend calls.
//! [`blocking::Handle`] drives the same futures to completion for callers
//! without an executor.

pub mod blocking;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::backend::{AccessMode, Backend, ByteReader, ByteWriter, Metadata};
use crate::cleanup::CleanupRegistry;
use crate::error::{Error, Result};
use crate::path::{default_base, CanonicalPath, PathRelationship};

const KIB: f64 = 1024.0;

/// An addressable file or directory reference.
///
/// The handle is valid whether or not anything exists at its path.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use filehandle::{Handle, MemoryBackend};
/// use futures::executor::block_on;
///
/// let fs = Arc::new(MemoryBackend::new());
/// let notes = Handle::new("/notes/today.txt", fs.clone());
///
/// block_on(async {
///     assert!(!notes.exists().await);
///     assert!(notes.parent().unwrap().mkdir(true).await);
///     assert!(notes.write("Hello,").await);
///     assert!(notes.append(" world!").await);
///     assert_eq!(notes.read_text().await.as_deref(), Some("Hello, world!"));
/// });
/// ```
#[derive(Clone)]
pub struct Handle {
    path: CanonicalPath,
    backend: Arc<dyn Backend>,
}

impl Handle {
    /// Normalize `raw` against the process working directory.
    #[must_use]
    pub fn new(raw: &str, backend: Arc<dyn Backend>) -> Self {
        Self::resolve(raw, default_base(), backend)
    }

    /// Normalize `raw` against an explicit base.
    #[must_use]
    pub fn resolve(raw: &str, base: &[String], backend: Arc<dyn Backend>) -> Self {
        Self::from_path(CanonicalPath::resolve(raw, base), backend)
    }

    /// Wrap segments that are already canonical. They are not re-normalized.
    #[must_use]
    pub fn from_segments(segments: Vec<String>, backend: Arc<dyn Backend>) -> Self {
        Self::from_path(CanonicalPath::from_segments(segments), backend)
    }

    /// Wrap an existing canonical path.
    #[must_use]
    pub fn from_path(path: CanonicalPath, backend: Arc<dyn Backend>) -> Self {
        Self { path, backend }
    }

    /// The process working directory (as captured at first use).
    #[must_use]
    pub fn cwd(backend: Arc<dyn Backend>) -> Self {
        Self::from_segments(default_base().to_vec(), backend)
    }

    /// The current user's home directory, if it can be determined.
    #[must_use]
    pub fn home(backend: Arc<dyn Backend>) -> Option<Self> {
        let dir = home::home_dir()?;
        Some(Self::resolve(&dir.to_string_lossy(), &[], backend))
    }

    /// The canonical path.
    #[must_use]
    pub fn path(&self) -> &CanonicalPath {
        &self.path
    }

    /// The backend this handle forwards to.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// The canonical segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        self.path.segments()
    }

    /// The path joined with the platform separator.
    #[must_use]
    pub fn full_path(&self) -> String {
        self.path.full_path()
    }

    /// A handle at `parts` appended to this path and re-normalized.
    ///
    /// `..` in `parts` walks upward.
    #[must_use]
    pub fn to<S: AsRef<str>>(&self, parts: &[S]) -> Self {
        self.derive(self.path.join(parts))
    }

    /// A handle at the direct child `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        self.derive(self.path.child(name))
    }

    /// A handle at the parent directory, `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.path.parent().map(|path| self.derive(path))
    }

    /// The last path segment.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.path.name()
    }

    /// The name without its extension.
    #[must_use]
    pub fn stem(&self) -> Option<&str> {
        self.path.stem()
    }

    /// Text after the last `.` in the name.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.path.extension()
    }

    /// Whether the name starts with `.`.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.path.is_hidden()
    }

    /// A `file://` URL for this path.
    #[must_use]
    pub fn uri(&self) -> Option<Url> {
        self.path.uri()
    }

    /// True iff `other` lies strictly below this handle's path.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.path.contains(&other.path)
    }

    /// How this handle's path relates to `other`'s.
    #[must_use]
    pub fn relationship(&self, other: &Self) -> PathRelationship {
        self.path.relationship(&other.path)
    }

    /// Queue this path for deletion when `registry` is flushed.
    pub fn delete_on_exit(&self, registry: &CleanupRegistry, recursive: bool) {
        registry.register(self.clone(), recursive);
    }

    fn derive(&self, path: CanonicalPath) -> Self {
        Self {
            path,
            backend: Arc::clone(&self.backend),
        }
    }

    /// Convert a backend result into a crate result, logging failures.
    pub(crate) fn adapt<T>(&self, operation: &'static str, result: io::Result<T>) -> Result<T> {
        result.map_err(|source| {
            let err = Error::from_io(operation, self.path.to_path_buf(), source);
            debug!("{operation}: {err}");
            err
        })
    }

    fn settle<T>(&self, operation: &'static str, result: io::Result<T>) -> Option<T> {
        self.adapt(operation, result).ok()
    }

    fn succeeded(&self, operation: &'static str, result: io::Result<()>) -> bool {
        self.adapt(operation, result).is_ok()
    }

    pub(crate) fn os_path(&self) -> PathBuf {
        self.path.to_path_buf()
    }
}

// Metadata queries.
impl Handle {
    /// Whether anything exists at this path.
    pub async fn exists(&self) -> bool {
        let result = self.backend.exists(&self.os_path()).await;
        self.settle("exists", result).unwrap_or(false)
    }

    /// Metadata, following symbolic links.
    pub async fn metadata(&self) -> Option<Metadata> {
        let result = self.backend.stat(&self.os_path()).await;
        self.settle("stat", result)
    }

    /// Metadata of the entry itself, not following a final symbolic link.
    pub async fn symlink_metadata(&self) -> Option<Metadata> {
        let result = self.backend.lstat(&self.os_path()).await;
        self.settle("lstat", result)
    }

    /// Whether this is a regular file.
    pub async fn is_file(&self) -> bool {
        self.metadata().await.is_some_and(|meta| meta.is_file())
    }

    /// Whether this is a directory.
    pub async fn is_directory(&self) -> bool {
        self.metadata().await.is_some_and(|meta| meta.is_dir())
    }

    /// Whether this is a symbolic link.
    pub async fn is_symlink(&self) -> bool {
        self.symlink_metadata()
            .await
            .is_some_and(|meta| meta.is_symlink())
    }

    /// Size in bytes.
    pub async fn size(&self) -> Option<u64> {
        self.metadata().await.map(|meta| meta.size)
    }

    /// Size in KiB.
    #[allow(clippy::cast_precision_loss)]
    pub async fn size_kb(&self) -> Option<f64> {
        self.size().await.map(|bytes| bytes as f64 / KIB)
    }

    /// Size in MiB.
    #[allow(clippy::cast_precision_loss)]
    pub async fn size_mb(&self) -> Option<f64> {
        self.size().await.map(|bytes| bytes as f64 / (KIB * KIB))
    }

    /// Size in GiB.
    #[allow(clippy::cast_precision_loss)]
    pub async fn size_gb(&self) -> Option<f64> {
        self.size().await.map(|bytes| bytes as f64 / (KIB * KIB * KIB))
    }

    /// Creation time.
    pub async fn created(&self) -> Option<DateTime<Utc>> {
        self.metadata().await.and_then(|meta| meta.created)
    }

    /// Last modification time.
    pub async fn modified(&self) -> Option<DateTime<Utc>> {
        self.metadata().await.and_then(|meta| meta.modified)
    }

    /// Last access time.
    pub async fn accessed(&self) -> Option<DateTime<Utc>> {
        self.metadata().await.and_then(|meta| meta.accessed)
    }

    /// Unix permission bits.
    pub async fn mode(&self) -> Option<u32> {
        self.metadata().await.and_then(|meta| meta.mode)
    }

    async fn access(&self, mode: AccessMode) -> Option<bool> {
        let result = self.backend.access(&self.os_path(), mode).await;
        self.settle("access", result)
    }

    /// Whether the entry's permissions grant reading.
    ///
    /// See [`Backend::access`]: this is a permission check, not an attempt.
    pub async fn can_read(&self) -> Option<bool> {
        self.access(AccessMode::Read).await
    }

    /// Whether the entry's permissions grant writing.
    pub async fn can_write(&self) -> Option<bool> {
        self.access(AccessMode::Write).await
    }

    /// Whether the entry is executable (traversable, for directories).
    pub async fn can_execute(&self) -> Option<bool> {
        self.access(AccessMode::Execute).await
    }

    /// Replace the permission bits.
    pub async fn set_permissions(&self, mode: u32) -> bool {
        let result = self.backend.set_permissions(&self.os_path(), mode).await;
        self.succeeded("set_permissions", result)
    }

    /// Whether a directory has no children, or a file has no bytes.
    ///
    /// `None` when the entry cannot be inspected.
    pub async fn is_empty(&self) -> Option<bool> {
        let meta = self.metadata().await?;
        if meta.is_dir() {
            self.list_names().await.map(|names| names.is_empty())
        } else {
            Some(meta.size == 0)
        }
    }
}

// Content and directory I/O.
impl Handle {
    /// Entire file contents.
    pub async fn read_bytes(&self) -> Option<Vec<u8>> {
        let result = self.backend.read(&self.os_path()).await;
        self.settle("read", result)
    }

    /// Entire file contents as UTF-8 text.
    pub async fn read_text(&self) -> Option<String> {
        let result = self.backend.read_to_string(&self.os_path()).await;
        self.settle("read_to_string", result)
    }

    /// File contents parsed as JSON. `None` if unreadable or malformed.
    pub async fn read_json(&self) -> Option<Value> {
        self.read_json_as().await
    }

    /// File contents deserialized into `T`.
    pub async fn read_json_as<T: DeserializeOwned>(&self) -> Option<T> {
        let text = self.read_text().await?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("read_json: {}: {e}", self.full_path());
                None
            }
        }
    }

    /// Replace the file contents, creating the file if missing.
    pub async fn write(&self, contents: impl AsRef<[u8]> + Send) -> bool {
        let result = self
            .backend
            .write(&self.os_path(), contents.as_ref(), false)
            .await;
        self.succeeded("write", result)
    }

    /// Append to the file, creating it if missing.
    pub async fn append(&self, contents: impl AsRef<[u8]> + Send) -> bool {
        let result = self
            .backend
            .write(&self.os_path(), contents.as_ref(), true)
            .await;
        self.succeeded("append", result)
    }

    /// Serialize `value` as JSON and write it.
    pub async fn write_json<T: Serialize + ?Sized + Sync>(&self, value: &T, pretty: bool) -> bool {
        let encoded = if pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        match encoded {
            Ok(bytes) => self.write(bytes).await,
            Err(e) => {
                debug!("write_json: {}: {e}", self.full_path());
                false
            }
        }
    }

    /// Create an empty file if nothing exists here yet.
    pub async fn touch(&self) -> bool {
        let result = self.backend.write(&self.os_path(), &[], true).await;
        self.succeeded("touch", result)
    }

    /// Names of the immediate children, in listing order.
    pub async fn list_names(&self) -> Option<Vec<String>> {
        let result = self.backend.read_dir(&self.os_path()).await;
        self.settle("read_dir", result)
    }

    /// Handles for the immediate children, in listing order.
    pub async fn list(&self) -> Option<Vec<Self>> {
        let names = self.list_names().await?;
        Some(names.iter().map(|name| self.child(name)).collect())
    }

    /// Create this directory, and missing parents when `recursive`.
    pub async fn mkdir(&self, recursive: bool) -> bool {
        let result = self.backend.create_dir(&self.os_path(), recursive).await;
        self.succeeded("create_dir", result)
    }

    /// The target of a symbolic link, resolved against the link's directory.
    pub async fn read_link(&self) -> Option<Self> {
        let result = self.backend.read_link(&self.os_path()).await;
        let target = self.settle("read_link", result)?;
        let base = self.path.parent().unwrap_or_default();
        Some(self.derive(CanonicalPath::resolve(
            &target.to_string_lossy(),
            base.segments(),
        )))
    }

    /// Open a continuous byte reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] when the backend has no byte channels,
    /// or the classified backend error when opening fails.
    pub async fn reader(&self) -> Result<ByteReader> {
        let result = self.backend.open_read(&self.os_path()).await;
        self.adapt("open_read", result)
    }

    /// Open a continuous byte writer, truncating unless `append`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] when the backend has no byte channels,
    /// or the classified backend error when opening fails.
    pub async fn writer(&self, append: bool) -> Result<ByteWriter> {
        let result = self.backend.open_write(&self.os_path(), append).await;
        self.adapt("open_write", result)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("path", &self.path.full_path())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Handle {}
