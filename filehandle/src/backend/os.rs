//! Host filesystem backend.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{AccessMode, Backend, ByteReader, ByteWriter, FileKind, Metadata};

/// A [`Backend`] over the host filesystem using `std::fs`.
///
/// Calls complete synchronously inside the returned futures, so the async
/// surface adds no real concurrency. Directory listings are sorted by name
/// to keep traversal order stable across platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsBackend;

impl OsBackend {
    /// Create a new host filesystem backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn timestamp(time: io::Result<SystemTime>) -> Option<DateTime<Utc>> {
    time.ok().map(DateTime::<Utc>::from)
}

fn kind_of(file_type: fs::FileType) -> FileKind {
    if file_type.is_symlink() {
        FileKind::Symlink
    } else if file_type.is_dir() {
        FileKind::Directory
    } else if file_type.is_file() {
        FileKind::File
    } else {
        FileKind::Other
    }
}

#[cfg(unix)]
fn mode_of(meta: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(meta.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn mode_of(_meta: &fs::Metadata) -> Option<u32> {
    None
}

fn convert(meta: &fs::Metadata) -> Metadata {
    Metadata {
        kind: kind_of(meta.file_type()),
        size: meta.len(),
        created: timestamp(meta.created()),
        modified: timestamp(meta.modified()),
        accessed: timestamp(meta.accessed()),
        mode: mode_of(meta),
    }
}

#[async_trait]
impl Backend for OsBackend {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    async fn stat(&self, path: &Path) -> io::Result<Metadata> {
        fs::metadata(path).map(|meta| convert(&meta))
    }

    async fn lstat(&self, path: &Path) -> io::Result<Metadata> {
        fs::symlink_metadata(path).map(|meta| convert(&meta))
    }

    // Unix: granted if any of the owner, group or other bits allow `mode`.
    async fn access(&self, path: &Path, mode: AccessMode) -> io::Result<bool> {
        let meta = fs::metadata(path)?;
        match mode_of(&meta) {
            Some(bits) => Ok(bits & mode.mode_bits() != 0),
            None => Ok(match mode {
                AccessMode::Read => true,
                AccessMode::Write => !meta.permissions().readonly(),
                AccessMode::Execute => meta.is_dir(),
            }),
        }
    }

    #[cfg(unix)]
    async fn set_permissions(&self, path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }

    #[cfg(not(unix))]
    async fn set_permissions(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_readonly(mode & AccessMode::Write.mode_bits() == 0);
        fs::set_permissions(path, permissions)
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    async fn create_dir(&self, path: &Path, recursive: bool) -> io::Result<()> {
        if recursive {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        }
    }

    async fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(path)
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    async fn write(&self, path: &Path, contents: &[u8], append: bool) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        file.write_all(contents)?;
        file.flush()
    }

    async fn open_read(&self, path: &Path) -> io::Result<ByteReader> {
        Ok(Box::new(fs::File::open(path)?))
    }

    async fn open_write(&self, path: &Path, append: bool) -> io::Result<ByteWriter> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_write_append_read() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("greeting.txt");
        let backend = OsBackend::new();

        block_on(backend.write(&file, b"Hello,", false)).unwrap();
        block_on(backend.write(&file, b" world!", true)).unwrap();
        assert_eq!(
            block_on(backend.read_to_string(&file)).unwrap(),
            "Hello, world!"
        );

        block_on(backend.write(&file, b"reset", false)).unwrap();
        assert_eq!(block_on(backend.read(&file)).unwrap(), b"reset");
    }

    #[test]
    fn test_stat_kinds() {
        let temp = TempDir::new().unwrap();
        let backend = OsBackend::new();
        let file = temp.path().join("f");
        fs::write(&file, b"abc").unwrap();

        let meta = block_on(backend.stat(&file)).unwrap();
        assert!(meta.is_file());
        assert_eq!(meta.size, 3);
        assert!(meta.modified.is_some());

        let meta = block_on(backend.stat(temp.path())).unwrap();
        assert!(meta.is_dir());

        let err = block_on(backend.stat(&temp.path().join("missing"))).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_lstat_sees_symlink() {
        let temp = TempDir::new().unwrap();
        let backend = OsBackend::new();
        let target = temp.path().join("target");
        let link = temp.path().join("link");
        fs::create_dir(&target).unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(block_on(backend.stat(&link)).unwrap().is_dir());
        assert!(block_on(backend.lstat(&link)).unwrap().is_symlink());
        assert_eq!(block_on(backend.read_link(&link)).unwrap(), target);
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions_roundtrip() {
        let temp = TempDir::new().unwrap();
        let backend = OsBackend::new();
        let file = temp.path().join("script.sh");
        fs::write(&file, b"#!/bin/sh").unwrap();

        block_on(backend.set_permissions(&file, 0o755)).unwrap();
        assert_eq!(block_on(backend.stat(&file)).unwrap().mode, Some(0o755));
        assert!(block_on(backend.access(&file, AccessMode::Execute)).unwrap());

        block_on(backend.set_permissions(&file, 0o644)).unwrap();
        assert!(!block_on(backend.access(&file, AccessMode::Execute)).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_access_reads_any_permission_class() {
        let temp = TempDir::new().unwrap();
        let backend = OsBackend::new();
        let file = temp.path().join("other-only");
        fs::write(&file, b"x").unwrap();

        block_on(backend.set_permissions(&file, 0o004)).unwrap();
        assert!(block_on(backend.access(&file, AccessMode::Read)).unwrap());
        assert!(!block_on(backend.access(&file, AccessMode::Write)).unwrap());
    }

    #[test]
    fn test_read_dir_sorted() {
        let temp = TempDir::new().unwrap();
        let backend = OsBackend::new();
        for name in ["c", "a", "b"] {
            fs::write(temp.path().join(name), b"").unwrap();
        }
        assert_eq!(
            block_on(backend.read_dir(temp.path())).unwrap(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_create_and_remove_dirs() {
        let temp = TempDir::new().unwrap();
        let backend = OsBackend::new();
        let deep = temp.path().join("x").join("y").join("z");

        assert!(block_on(backend.create_dir(&deep, false)).is_err());
        block_on(backend.create_dir(&deep, true)).unwrap();
        block_on(backend.create_dir(&deep, true)).unwrap();
        assert!(deep.is_dir());

        assert!(block_on(backend.remove_dir(&temp.path().join("x"))).is_err());
        block_on(backend.remove_dir_all(&temp.path().join("x"))).unwrap();
        assert!(!block_on(backend.exists(&temp.path().join("x"))).unwrap());
    }

    #[test]
    fn test_streams() {
        let temp = TempDir::new().unwrap();
        let backend = OsBackend::new();
        let file = temp.path().join("stream.bin");

        let mut writer = block_on(backend.open_write(&file, false)).unwrap();
        writer.write_all(b"chunk one ").unwrap();
        writer.write_all(b"chunk two").unwrap();
        drop(writer);

        let mut reader = block_on(backend.open_read(&file)).unwrap();
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        assert_eq!(text, "chunk one chunk two");
    }

    #[test]
    fn test_rename() {
        let temp = TempDir::new().unwrap();
        let backend = OsBackend::new();
        let from = temp.path().join("old");
        let to = temp.path().join("new");
        fs::write(&from, b"data").unwrap();

        block_on(backend.rename(&from, &to)).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"data");
    }
}
