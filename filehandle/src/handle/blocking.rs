//! Blocking handle surface.
//!
//! Each method drives the async method of the same name to completion on the
//! current thread with `futures::executor::block_on`, so the two calling
//! conventions share one implementation.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::executor::{block_on, block_on_stream, BlockingStream};
use futures::stream::BoxStream;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::backend::{Backend, ByteReader, ByteWriter, Metadata};
use crate::cleanup::CleanupRegistry;
use crate::error::Result;
use crate::path::{CanonicalPath, PathRelationship};

/// A file handle whose operations block the calling thread.
///
/// Do not call these methods from inside an async executor; use the async
/// [`crate::Handle`] there.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use filehandle::blocking::Handle;
/// use filehandle::MemoryBackend;
///
/// let fs = Arc::new(MemoryBackend::new());
/// let dir = Handle::new("/project", fs);
/// assert!(dir.mkdir(false));
/// assert!(dir.child("README").write("hi"));
///
/// let names: Vec<String> = dir.walk().map(|h| h.full_path()).collect();
/// assert_eq!(names.len(), 2);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Handle {
    inner: super::Handle,
}

impl Handle {
    /// Normalize `raw` against the process working directory.
    #[must_use]
    pub fn new(raw: &str, backend: Arc<dyn Backend>) -> Self {
        super::Handle::new(raw, backend).into()
    }

    /// Normalize `raw` against an explicit base.
    #[must_use]
    pub fn resolve(raw: &str, base: &[String], backend: Arc<dyn Backend>) -> Self {
        super::Handle::resolve(raw, base, backend).into()
    }

    /// Wrap segments that are already canonical.
    #[must_use]
    pub fn from_segments(segments: Vec<String>, backend: Arc<dyn Backend>) -> Self {
        super::Handle::from_segments(segments, backend).into()
    }

    /// The process working directory.
    #[must_use]
    pub fn cwd(backend: Arc<dyn Backend>) -> Self {
        super::Handle::cwd(backend).into()
    }

    /// The current user's home directory.
    #[must_use]
    pub fn home(backend: Arc<dyn Backend>) -> Option<Self> {
        super::Handle::home(backend).map(Into::into)
    }

    /// The async handle underneath.
    #[must_use]
    pub fn as_async(&self) -> &super::Handle {
        &self.inner
    }

    /// Unwrap into the async handle.
    #[must_use]
    pub fn into_async(self) -> super::Handle {
        self.inner
    }

    /// The canonical path.
    #[must_use]
    pub fn path(&self) -> &CanonicalPath {
        self.inner.path()
    }

    /// The canonical segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        self.inner.segments()
    }

    /// The path joined with the platform separator.
    #[must_use]
    pub fn full_path(&self) -> String {
        self.inner.full_path()
    }

    /// A handle at `parts` appended to this path and re-normalized.
    #[must_use]
    pub fn to<S: AsRef<str>>(&self, parts: &[S]) -> Self {
        self.inner.to(parts).into()
    }

    /// A handle at the direct child `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        self.inner.child(name).into()
    }

    /// A handle at the parent directory.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.inner.parent().map(Into::into)
    }

    /// The last path segment.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    /// The name without its extension.
    #[must_use]
    pub fn stem(&self) -> Option<&str> {
        self.inner.stem()
    }

    /// Text after the last `.` in the name.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.inner.extension()
    }

    /// Whether the name starts with `.`.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }

    /// A `file://` URL for this path.
    #[must_use]
    pub fn uri(&self) -> Option<Url> {
        self.inner.uri()
    }

    /// True iff `other` lies strictly below this path.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.inner.contains(&other.inner)
    }

    /// How this path relates to `other`.
    #[must_use]
    pub fn relationship(&self, other: &Self) -> PathRelationship {
        self.inner.relationship(&other.inner)
    }

    /// Queue this path for deletion when `registry` is flushed.
    pub fn delete_on_exit(&self, registry: &CleanupRegistry, recursive: bool) {
        self.inner.delete_on_exit(registry, recursive);
    }

    /// See [`crate::Handle::exists`].
    #[must_use]
    pub fn exists(&self) -> bool {
        block_on(self.inner.exists())
    }

    /// See [`crate::Handle::metadata`].
    #[must_use]
    pub fn metadata(&self) -> Option<Metadata> {
        block_on(self.inner.metadata())
    }

    /// See [`crate::Handle::symlink_metadata`].
    #[must_use]
    pub fn symlink_metadata(&self) -> Option<Metadata> {
        block_on(self.inner.symlink_metadata())
    }

    /// See [`crate::Handle::is_file`].
    #[must_use]
    pub fn is_file(&self) -> bool {
        block_on(self.inner.is_file())
    }

    /// See [`crate::Handle::is_directory`].
    #[must_use]
    pub fn is_directory(&self) -> bool {
        block_on(self.inner.is_directory())
    }

    /// See [`crate::Handle::is_symlink`].
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        block_on(self.inner.is_symlink())
    }

    /// See [`crate::Handle::size`].
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        block_on(self.inner.size())
    }

    /// See [`crate::Handle::size_kb`].
    #[must_use]
    pub fn size_kb(&self) -> Option<f64> {
        block_on(self.inner.size_kb())
    }

    /// See [`crate::Handle::size_mb`].
    #[must_use]
    pub fn size_mb(&self) -> Option<f64> {
        block_on(self.inner.size_mb())
    }

    /// See [`crate::Handle::size_gb`].
    #[must_use]
    pub fn size_gb(&self) -> Option<f64> {
        block_on(self.inner.size_gb())
    }

    /// See [`crate::Handle::created`].
    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        block_on(self.inner.created())
    }

    /// See [`crate::Handle::modified`].
    #[must_use]
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        block_on(self.inner.modified())
    }

    /// See [`crate::Handle::accessed`].
    #[must_use]
    pub fn accessed(&self) -> Option<DateTime<Utc>> {
        block_on(self.inner.accessed())
    }

    /// See [`crate::Handle::mode`].
    #[must_use]
    pub fn mode(&self) -> Option<u32> {
        block_on(self.inner.mode())
    }

    /// See [`crate::Handle::can_read`].
    #[must_use]
    pub fn can_read(&self) -> Option<bool> {
        block_on(self.inner.can_read())
    }

    /// See [`crate::Handle::can_write`].
    #[must_use]
    pub fn can_write(&self) -> Option<bool> {
        block_on(self.inner.can_write())
    }

    /// See [`crate::Handle::can_execute`].
    #[must_use]
    pub fn can_execute(&self) -> Option<bool> {
        block_on(self.inner.can_execute())
    }

    /// See [`crate::Handle::set_permissions`].
    pub fn set_permissions(&self, mode: u32) -> bool {
        block_on(self.inner.set_permissions(mode))
    }

    /// See [`crate::Handle::is_empty`].
    #[must_use]
    pub fn is_empty(&self) -> Option<bool> {
        block_on(self.inner.is_empty())
    }

    /// See [`crate::Handle::read_bytes`].
    #[must_use]
    pub fn read_bytes(&self) -> Option<Vec<u8>> {
        block_on(self.inner.read_bytes())
    }

    /// See [`crate::Handle::read_text`].
    #[must_use]
    pub fn read_text(&self) -> Option<String> {
        block_on(self.inner.read_text())
    }

    /// See [`crate::Handle::read_json`].
    #[must_use]
    pub fn read_json(&self) -> Option<Value> {
        block_on(self.inner.read_json())
    }

    /// See [`crate::Handle::read_json_as`].
    #[must_use]
    pub fn read_json_as<T: DeserializeOwned>(&self) -> Option<T> {
        block_on(self.inner.read_json_as())
    }

    /// See [`crate::Handle::write`].
    pub fn write(&self, contents: impl AsRef<[u8]> + Send) -> bool {
        block_on(self.inner.write(contents))
    }

    /// See [`crate::Handle::append`].
    pub fn append(&self, contents: impl AsRef<[u8]> + Send) -> bool {
        block_on(self.inner.append(contents))
    }

    /// See [`crate::Handle::write_json`].
    pub fn write_json<T: Serialize + ?Sized + Sync>(&self, value: &T, pretty: bool) -> bool {
        block_on(self.inner.write_json(value, pretty))
    }

    /// See [`crate::Handle::touch`].
    pub fn touch(&self) -> bool {
        block_on(self.inner.touch())
    }

    /// See [`crate::Handle::list_names`].
    #[must_use]
    pub fn list_names(&self) -> Option<Vec<String>> {
        block_on(self.inner.list_names())
    }

    /// See [`crate::Handle::list`].
    #[must_use]
    pub fn list(&self) -> Option<Vec<Self>> {
        block_on(self.inner.list()).map(|children| children.into_iter().map(Into::into).collect())
    }

    /// See [`crate::Handle::mkdir`].
    pub fn mkdir(&self, recursive: bool) -> bool {
        block_on(self.inner.mkdir(recursive))
    }

    /// See [`crate::Handle::read_link`].
    #[must_use]
    pub fn read_link(&self) -> Option<Self> {
        block_on(self.inner.read_link()).map(Into::into)
    }

    /// See [`crate::Handle::reader`].
    ///
    /// # Errors
    ///
    /// Fails when the backend cannot open a byte channel.
    pub fn reader(&self) -> Result<ByteReader> {
        block_on(self.inner.reader())
    }

    /// See [`crate::Handle::writer`].
    ///
    /// # Errors
    ///
    /// Fails when the backend cannot open a byte channel.
    pub fn writer(&self, append: bool) -> Result<ByteWriter> {
        block_on(self.inner.writer(append))
    }

    /// See [`crate::Handle::walk`].
    #[must_use]
    pub fn walk(&self) -> Walk {
        Walk {
            inner: block_on_stream(self.inner.walk()),
        }
    }

    /// See [`crate::Handle::delete`].
    pub fn delete(&self, recursive: bool) -> bool {
        block_on(self.inner.delete(recursive))
    }

    /// See [`crate::Handle::copy_to`].
    pub fn copy_to(&self, dest: &Self, overwrite: bool, recursive: bool) -> bool {
        block_on(self.inner.copy_to(&dest.inner, overwrite, recursive))
    }

    /// See [`crate::Handle::rename_to`].
    pub fn rename_to(&self, dest: &Self, overwrite: bool, recursive: bool) -> bool {
        block_on(self.inner.rename_to(&dest.inner, overwrite, recursive))
    }

    /// See [`crate::Handle::clear`].
    pub fn clear(&self, recursive: bool) -> bool {
        block_on(self.inner.clear(recursive))
    }
}

impl From<super::Handle> for Handle {
    fn from(inner: super::Handle) -> Self {
        Self { inner }
    }
}

impl From<Handle> for super::Handle {
    fn from(handle: Handle) -> Self {
        handle.inner
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// Blocking pre-order walk, yielding one handle per step.
pub struct Walk {
    inner: BlockingStream<BoxStream<'static, super::Handle>>,
}

impl Iterator for Walk {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Into::into)
    }
}

impl fmt::Debug for Walk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walk").finish_non_exhaustive()
    }
}
