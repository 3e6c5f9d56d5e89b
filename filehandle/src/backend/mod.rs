//! The backend capability contract that handles forward to.
//!
//! A [`Backend`] is a set of low-level filesystem operations. Every method has
//! a default body returning an `io::ErrorKind::Unsupported` error, so a
//! backend only implements what it can actually do and the handle layer
//! discovers the rest at call time.
//!
//! Two implementations ship with the crate:
//! - [`OsBackend`]: the host filesystem through `std::fs`
//! - [`MemoryBackend`]: an in-memory tree, handy for tests and sandboxes

mod memory;
mod os;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use memory::MemoryBackend;
pub use os::OsBackend;

/// A continuous byte source opened by [`Backend::open_read`].
pub type ByteReader = Box<dyn Read + Send>;

/// A continuous byte sink opened by [`Backend::open_write`].
pub type ByteWriter = Box<dyn Write + Send>;

/// Type of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// A symbolic link (only reported by `lstat`).
    Symlink,
    /// Anything else (devices, sockets, fifos).
    Other,
}

/// What a backend knows about one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Entry type.
    pub kind: FileKind,
    /// Size in bytes.
    pub size: u64,
    /// Creation time, if the backend tracks it.
    pub created: Option<DateTime<Utc>>,
    /// Last modification time.
    pub modified: Option<DateTime<Utc>>,
    /// Last access time.
    pub accessed: Option<DateTime<Utc>>,
    /// Unix permission bits, if available.
    pub mode: Option<u32>,
}

impl Metadata {
    /// Metadata with only a kind and size filled in.
    #[must_use]
    pub const fn new(kind: FileKind, size: u64) -> Self {
        Self {
            kind,
            size,
            created: None,
            modified: None,
            accessed: None,
            mode: None,
        }
    }

    /// Whether this is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    /// Whether this is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    /// Whether this is a symbolic link.
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.kind == FileKind::Symlink
    }
}

/// Access being checked by [`Backend::access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Permission to read.
    Read,
    /// Permission to write.
    Write,
    /// Permission to execute (or traverse, for directories).
    Execute,
}

impl AccessMode {
    /// The owner/group/other bits granting this access in a Unix mode.
    #[must_use]
    pub const fn mode_bits(self) -> u32 {
        match self {
            Self::Read => 0o444,
            Self::Write => 0o222,
            Self::Execute => 0o111,
        }
    }
}

/// The error every defaulted [`Backend`] method returns.
#[must_use]
pub fn unsupported(operation: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{operation} is not supported by this backend"),
    )
}

/// Low-level filesystem operations a [`Handle`](crate::Handle) forwards to.
///
/// Paths passed in are always rendered from canonical segments, so they are
/// absolute and free of `.`/`..` components.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Whether `path` exists. Defaults to a `stat` probe.
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        match self.stat(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Metadata for `path`, following symbolic links.
    async fn stat(&self, path: &Path) -> io::Result<Metadata> {
        let _ = path;
        Err(unsupported("stat"))
    }

    /// Metadata for `path` itself, without following a final symbolic link.
    ///
    /// Backends without links can rely on the default, which is `stat`.
    async fn lstat(&self, path: &Path) -> io::Result<Metadata> {
        self.stat(path).await
    }

    /// Whether `path`'s permissions grant `mode`.
    ///
    /// This reads permission data only; it does not attempt the access, so
    /// it can disagree with what the current process is actually allowed.
    async fn access(&self, path: &Path, mode: AccessMode) -> io::Result<bool> {
        let _ = (path, mode);
        Err(unsupported("access"))
    }

    /// Replace the permission bits of `path`.
    async fn set_permissions(&self, path: &Path, mode: u32) -> io::Result<()> {
        let _ = (path, mode);
        Err(unsupported("set_permissions"))
    }

    /// Names of the immediate children of a directory, in listing order.
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let _ = path;
        Err(unsupported("read_dir"))
    }

    /// Create a directory, and its missing parents when `recursive`.
    ///
    /// With `recursive`, an existing directory is not an error.
    async fn create_dir(&self, path: &Path, recursive: bool) -> io::Result<()> {
        let _ = (path, recursive);
        Err(unsupported("create_dir"))
    }

    /// Remove an empty directory.
    async fn remove_dir(&self, path: &Path) -> io::Result<()> {
        let _ = path;
        Err(unsupported("remove_dir"))
    }

    /// Remove a directory and everything below it in one native call.
    ///
    /// Leaving this unimplemented makes recursive deletes fall back to
    /// child-by-child removal.
    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let _ = path;
        Err(unsupported("remove_dir_all"))
    }

    /// Remove a file or symbolic link.
    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        let _ = path;
        Err(unsupported("remove_file"))
    }

    /// Move `from` to `to`.
    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let _ = (from, to);
        Err(unsupported("rename"))
    }

    /// Target of a symbolic link, as stored.
    async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        let _ = path;
        Err(unsupported("read_link"))
    }

    /// Entire file contents.
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let _ = path;
        Err(unsupported("read"))
    }

    /// Entire file contents decoded as UTF-8.
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read(path).await?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write `contents`, replacing the file or appending to it.
    ///
    /// The file is created if missing; its parent must exist.
    async fn write(&self, path: &Path, contents: &[u8], append: bool) -> io::Result<()> {
        let _ = (path, contents, append);
        Err(unsupported("write"))
    }

    /// Open a continuous reader over a file.
    async fn open_read(&self, path: &Path) -> io::Result<ByteReader> {
        let _ = path;
        Err(unsupported("open_read"))
    }

    /// Open a continuous writer to a file, truncating unless `append`.
    async fn open_write(&self, path: &Path, append: bool) -> io::Result<ByteWriter> {
        let _ = (path, append);
        Err(unsupported("open_write"))
    }
}
