//! In-memory backend.
//!
//! # Invariants
//!
//! 1. The root (empty key) is always present and is a directory.
//! 2. Keys are canonical segment lists.
//! 3. Every non-root entry has a parent entry that is a directory.
//!
//! Keys live in a `BTreeMap`, so every subtree is a contiguous key range and
//! directory listings come out sorted by name.

use std::collections::BTreeMap;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::{AccessMode, Backend, ByteReader, ByteWriter, FileKind, Metadata};
use crate::path::normalize;

const MAX_LINK_HOPS: usize = 40;
const DEFAULT_FILE_MODE: u32 = 0o644;
const DEFAULT_DIR_MODE: u32 = 0o755;

type Key = Vec<String>;

#[derive(Debug, Clone)]
enum Content {
    File(Vec<u8>),
    Dir,
    Symlink(PathBuf),
}

#[derive(Debug, Clone)]
struct Node {
    content: Content,
    mode: u32,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
    accessed: DateTime<Utc>,
}

impl Node {
    fn new(content: Content) -> Self {
        let now = Utc::now();
        let mode = match content {
            Content::Dir => DEFAULT_DIR_MODE,
            _ => DEFAULT_FILE_MODE,
        };
        Self {
            content,
            mode,
            created: now,
            modified: now,
            accessed: now,
        }
    }

    fn is_dir(&self) -> bool {
        matches!(self.content, Content::Dir)
    }

    fn metadata(&self) -> Metadata {
        let (kind, size) = match &self.content {
            Content::File(data) => (FileKind::File, data.len() as u64),
            Content::Dir => (FileKind::Directory, 0),
            Content::Symlink(target) => (
                FileKind::Symlink,
                target.as_os_str().len() as u64,
            ),
        };
        Metadata {
            kind,
            size,
            created: Some(self.created),
            modified: Some(self.modified),
            accessed: Some(self.accessed),
            mode: Some(self.mode),
        }
    }
}

fn not_found(key: &[String]) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("/{}: no such file or directory", key.join("/")),
    )
}

fn not_a_directory(key: &[String]) -> io::Error {
    io::Error::other(format!("/{}: not a directory", key.join("/")))
}

fn is_a_directory(key: &[String]) -> io::Error {
    io::Error::other(format!("/{}: is a directory", key.join("/")))
}

fn key_of(path: &Path) -> Key {
    normalize(&path.to_string_lossy(), &[])
}

#[derive(Debug)]
struct Tree {
    entries: BTreeMap<Key, Node>,
}

impl Tree {
    fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(Vec::new(), Node::new(Content::Dir));
        Self { entries }
    }

    /// Follow symbolic links along `key`. The final component is only
    /// followed when `follow_last` is set.
    fn resolve(&self, key: &[String], follow_last: bool) -> io::Result<Key> {
        let mut pending = key.to_vec();
        let mut hops = 0;

        loop {
            let mut resolved: Key = Vec::with_capacity(pending.len());
            let mut redirect = None;

            for (index, segment) in pending.iter().enumerate() {
                resolved.push(segment.clone());
                let last = index + 1 == pending.len();
                if last && !follow_last {
                    break;
                }
                if let Some(Node {
                    content: Content::Symlink(target),
                    ..
                }) = self.entries.get(&resolved)
                {
                    let parent = &resolved[..resolved.len() - 1];
                    let mut next = normalize(&target.to_string_lossy(), parent);
                    next.extend_from_slice(&pending[index + 1..]);
                    redirect = Some(next);
                    break;
                }
            }

            match redirect {
                None => return Ok(resolved),
                Some(next) => {
                    hops += 1;
                    if hops > MAX_LINK_HOPS {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidInput,
                            "too many levels of symbolic links",
                        ));
                    }
                    pending = next;
                }
            }
        }
    }

    fn node(&self, key: &[String], follow_last: bool) -> io::Result<(Key, &Node)> {
        let resolved = self.resolve(key, follow_last)?;
        match self.entries.get(&resolved) {
            Some(node) => Ok((resolved, node)),
            None => Err(not_found(key)),
        }
    }

    fn node_mut(&mut self, key: &[String], follow_last: bool) -> io::Result<&mut Node> {
        let resolved = self.resolve(key, follow_last)?;
        self.entries.get_mut(&resolved).ok_or_else(|| not_found(key))
    }

    /// Resolve the location a new entry at `key` would occupy. The parent
    /// must exist and be a directory.
    fn creation_key(&self, key: &[String]) -> io::Result<Key> {
        let Some((name, parent)) = key.split_last() else {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "the root always exists",
            ));
        };
        let (mut resolved, node) = self.node(parent, true)?;
        if !node.is_dir() {
            return Err(not_a_directory(parent));
        }
        resolved.push(name.clone());
        Ok(resolved)
    }

    fn children(&self, dir: &Key) -> impl Iterator<Item = &Key> + '_ {
        let depth = dir.len() + 1;
        let prefix = dir.clone();
        self.entries
            .range(dir.clone()..)
            .map(|(key, _)| key)
            .take_while(move |key| key.starts_with(&prefix))
            .filter(move |key| key.len() == depth)
    }

    fn subtree(&self, dir: &Key) -> Vec<Key> {
        self.entries
            .range(dir.clone()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(dir))
            .cloned()
            .collect()
    }

    fn read_dir(&self, key: &[String]) -> io::Result<Vec<String>> {
        let (resolved, node) = self.node(key, true)?;
        if !node.is_dir() {
            return Err(not_a_directory(key));
        }
        Ok(self
            .children(&resolved)
            .filter_map(|child| child.last().cloned())
            .collect())
    }

    fn create_dir(&mut self, key: &[String], recursive: bool) -> io::Result<()> {
        if recursive {
            for depth in 1..=key.len() {
                let prefix = &key[..depth];
                let existing = match self.node(prefix, true) {
                    Ok((_, node)) => Some(node.is_dir()),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => None,
                    Err(e) => return Err(e),
                };
                match existing {
                    Some(true) => {}
                    Some(false) => return Err(not_a_directory(prefix)),
                    None => {
                        let at = self.creation_key(prefix)?;
                        self.entries.insert(at, Node::new(Content::Dir));
                    }
                }
            }
            return Ok(());
        }

        let at = self.creation_key(key)?;
        if self.entries.contains_key(&at) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("/{}: already exists", key.join("/")),
            ));
        }
        self.entries.insert(at, Node::new(Content::Dir));
        Ok(())
    }

    fn remove_dir(&mut self, key: &[String], recursive: bool) -> io::Result<()> {
        let (resolved, node) = self.node(key, false)?;
        if !node.is_dir() {
            return Err(not_a_directory(key));
        }
        if resolved.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "cannot remove the root directory",
            ));
        }
        if !recursive && self.children(&resolved).next().is_some() {
            return Err(io::Error::other(format!(
                "/{}: directory not empty",
                key.join("/")
            )));
        }
        for doomed in self.subtree(&resolved) {
            self.entries.remove(&doomed);
        }
        Ok(())
    }

    fn remove_file(&mut self, key: &[String]) -> io::Result<()> {
        let (resolved, node) = self.node(key, false)?;
        if node.is_dir() {
            return Err(is_a_directory(key));
        }
        self.entries.remove(&resolved);
        Ok(())
    }

    fn rename(&mut self, from: &[String], to: &[String]) -> io::Result<()> {
        let (source, node) = self.node(from, false)?;
        let source_is_dir = node.is_dir();
        let target = self.creation_key(to)?;
        if source == target {
            return Ok(());
        }
        if target.starts_with(&source) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot move a directory into itself",
            ));
        }

        if let Some(existing) = self.entries.get(&target) {
            match (source_is_dir, existing.is_dir()) {
                (true, true) => {
                    if self.children(&target).next().is_some() {
                        return Err(io::Error::other(format!(
                            "/{}: directory not empty",
                            to.join("/")
                        )));
                    }
                }
                (false, true) => return Err(is_a_directory(to)),
                (true, false) => return Err(not_a_directory(to)),
                (false, false) => {}
            }
            self.entries.remove(&target);
        }

        for old in self.subtree(&source) {
            if let Some(node) = self.entries.remove(&old) {
                let mut new = target.clone();
                new.extend_from_slice(&old[source.len()..]);
                self.entries.insert(new, node);
            }
        }
        Ok(())
    }

    fn read(&mut self, key: &[String]) -> io::Result<Vec<u8>> {
        let node = self.node_mut(key, true)?;
        match &node.content {
            Content::File(data) => {
                let data = data.clone();
                node.accessed = Utc::now();
                Ok(data)
            }
            _ => Err(is_a_directory(key)),
        }
    }

    fn write(&mut self, key: &[String], contents: &[u8], append: bool) -> io::Result<()> {
        let resolved = self.resolve(key, true)?;
        if let Some(node) = self.entries.get_mut(&resolved) {
            let Content::File(data) = &mut node.content else {
                return Err(is_a_directory(key));
            };
            if !append {
                data.clear();
            }
            data.extend_from_slice(contents);
            node.modified = Utc::now();
            return Ok(());
        }

        let at = self.creation_key(&resolved)?;
        self.entries
            .insert(at, Node::new(Content::File(contents.to_vec())));
        Ok(())
    }

    fn symlink(&mut self, link: &[String], target: PathBuf) -> io::Result<()> {
        let at = self.creation_key(link)?;
        if self.entries.contains_key(&at) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("/{}: already exists", link.join("/")),
            ));
        }
        self.entries.insert(at, Node::new(Content::Symlink(target)));
        Ok(())
    }
}

/// A [`Backend`] keeping a whole directory tree in memory.
///
/// Clones share the same tree, so a test can hold one clone for seeding and
/// inspection while handles use another.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use filehandle::backend::{Backend, MemoryBackend};
/// use futures::executor::block_on;
///
/// let fs = MemoryBackend::new();
/// fs.insert_file("/docs/readme.md", "# hello").unwrap();
///
/// let names = block_on(fs.read_dir(Path::new("/docs"))).unwrap();
/// assert_eq!(names, ["readme.md"]);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    tree: Arc<Mutex<Tree>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// An empty tree holding only the root directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Arc::new(Mutex::new(Tree::new())),
        }
    }

    /// Create a file with `contents`, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Fails if an ancestor exists but is not a directory, or if `path` is a
    /// directory.
    pub fn insert_file(&self, path: &str, contents: impl Into<Vec<u8>>) -> io::Result<()> {
        let key = normalize(path, &[]);
        let mut tree = self.tree.lock();
        if let Some((_, parent)) = key.split_last() {
            tree.create_dir(parent, true)?;
        }
        tree.write(&key, &contents.into(), false)
    }

    /// Create a directory and any missing parents.
    ///
    /// # Errors
    ///
    /// Fails if an ancestor exists but is not a directory.
    pub fn insert_dir(&self, path: &str) -> io::Result<()> {
        self.tree.lock().create_dir(&normalize(path, &[]), true)
    }

    /// Create a symbolic link at `link` pointing to `target`, stored verbatim.
    ///
    /// Relative targets resolve against the link's parent directory.
    ///
    /// # Errors
    ///
    /// Fails if the link's parent is missing or `link` already exists.
    pub fn symlink(&self, link: &str, target: impl Into<PathBuf>) -> io::Result<()> {
        self.tree
            .lock()
            .symlink(&normalize(link, &[]), target.into())
    }

    /// Whether an entry exists at `path`, without following a final link.
    #[must_use]
    pub fn contains_path(&self, path: &str) -> bool {
        self.tree.lock().node(&normalize(path, &[]), false).is_ok()
    }

    /// Number of entries in the tree, the root included.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.tree.lock().entries.len()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn stat(&self, path: &Path) -> io::Result<Metadata> {
        let tree = self.tree.lock();
        tree.node(&key_of(path), true).map(|(_, node)| node.metadata())
    }

    async fn lstat(&self, path: &Path) -> io::Result<Metadata> {
        let tree = self.tree.lock();
        tree.node(&key_of(path), false).map(|(_, node)| node.metadata())
    }

    async fn access(&self, path: &Path, mode: AccessMode) -> io::Result<bool> {
        let tree = self.tree.lock();
        let (_, node) = tree.node(&key_of(path), true)?;
        Ok(node.mode & mode.mode_bits() != 0)
    }

    async fn set_permissions(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut tree = self.tree.lock();
        tree.node_mut(&key_of(path), true)?.mode = mode & 0o7777;
        Ok(())
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        self.tree.lock().read_dir(&key_of(path))
    }

    async fn create_dir(&self, path: &Path, recursive: bool) -> io::Result<()> {
        self.tree.lock().create_dir(&key_of(path), recursive)
    }

    async fn remove_dir(&self, path: &Path) -> io::Result<()> {
        self.tree.lock().remove_dir(&key_of(path), false)
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.tree.lock().remove_dir(&key_of(path), true)
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.tree.lock().remove_file(&key_of(path))
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.tree.lock().rename(&key_of(from), &key_of(to))
    }

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        let tree = self.tree.lock();
        let key = key_of(path);
        match tree.node(&key, false)? {
            (_, Node {
                content: Content::Symlink(target),
                ..
            }) => Ok(target.clone()),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("/{}: not a symbolic link", key.join("/")),
            )),
        }
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.tree.lock().read(&key_of(path))
    }

    async fn write(&self, path: &Path, contents: &[u8], append: bool) -> io::Result<()> {
        self.tree.lock().write(&key_of(path), contents, append)
    }

    async fn open_read(&self, path: &Path) -> io::Result<ByteReader> {
        let data = self.tree.lock().read(&key_of(path))?;
        Ok(Box::new(Cursor::new(data)))
    }

    async fn open_write(&self, path: &Path, append: bool) -> io::Result<ByteWriter> {
        let mut tree = self.tree.lock();
        let key = tree.resolve(&key_of(path), true)?;
        tree.write(&key, &[], append)?;
        Ok(Box::new(MemoryWriter {
            tree: Arc::clone(&self.tree),
            key,
        }))
    }
}

/// Writer that commits every chunk straight into the shared tree.
struct MemoryWriter {
    tree: Arc<Mutex<Tree>>,
    key: Key,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut tree = self.tree.lock();
        if !tree.entries.contains_key(&self.key) {
            return Err(not_found(&self.key));
        }
        tree.write(&self.key, buf, true)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
