//! Tree walks and bulk operations.
//!
//! Everything here is composed from single-entry handle operations. Children
//! of one directory are processed sequentially in listing order. Bulk
//! operations attempt every unit even after a failure and report the
//! aggregate, so a `false` result may leave a partially processed tree.
//!
//! The recursive operations return boxed futures because they call
//! themselves.

use std::io;

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, StreamExt};
use log::{info, warn};

use crate::handle::Handle;
use crate::path::PathRelationship;

/// Whether `dest` lies inside `source`'s tree, logging the refusal if so.
fn refuse_into_subtree(action: &str, source: &Handle, dest: &Handle) -> bool {
    if !PathRelationship::is_within(dest.path(), source.path()) {
        return false;
    }
    let relation = source.relationship(dest);
    warn!(
        "Refusing to {action} into its own subtree: {}",
        relation.description(source.path(), dest.path())
    );
    true
}

impl Handle {
    /// Lazily walk the tree rooted here, depth-first, in pre-order.
    ///
    /// Yields this handle first and then, if it is a directory, the walk of
    /// each child in listing order. Symbolic links are yielded but not
    /// descended into. Each step queries the backend fresh, so concurrent
    /// changes show up as stale or missing entries rather than errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use filehandle::{Handle, MemoryBackend};
    /// use futures::{executor::block_on, StreamExt};
    ///
    /// let fs = Arc::new(MemoryBackend::new());
    /// fs.insert_file("/root/a.txt", "").unwrap();
    /// fs.insert_file("/root/sub/b.txt", "").unwrap();
    ///
    /// let root = Handle::new("/root", fs);
    /// let names: Vec<_> = block_on(root.walk().map(|h| h.name().unwrap().to_string()).collect());
    /// assert_eq!(names, ["root", "a.txt", "sub", "b.txt"]);
    /// ```
    #[must_use]
    pub fn walk(&self) -> BoxStream<'static, Handle> {
        stream::unfold(vec![self.clone()], |mut pending| async move {
            let next = pending.pop()?;
            let is_dir = next
                .symlink_metadata()
                .await
                .is_some_and(|meta| meta.is_dir());
            if is_dir {
                if let Some(children) = next.list().await {
                    pending.extend(children.into_iter().rev());
                }
            }
            Some((next, pending))
        })
        .boxed()
    }

    /// Delete this entry.
    ///
    /// Non-directories are removed directly. A directory needs `recursive`
    /// unless it is empty. Recursive deletes use the backend's native
    /// `remove_dir_all` when it has one; otherwise children are deleted
    /// bottom-up, every child is attempted, and the directory itself is only
    /// removed when all of them succeeded.
    ///
    /// Returns `false` if nothing exists here.
    pub fn delete(&self, recursive: bool) -> BoxFuture<'_, bool> {
        async move {
            let Some(meta) = self.symlink_metadata().await else {
                return false;
            };
            let path = self.os_path();

            if !meta.is_dir() {
                let result = self.backend().remove_file(&path).await;
                return self.adapt("remove_file", result).is_ok();
            }
            if !recursive {
                let result = self.backend().remove_dir(&path).await;
                return self.adapt("remove_dir", result).is_ok();
            }

            match self.backend().remove_dir_all(&path).await {
                Ok(()) => {
                    info!("Deleted {self} recursively");
                    return true;
                }
                Err(e) if e.kind() == io::ErrorKind::Unsupported => {}
                Err(e) => return self.adapt::<()>("remove_dir_all", Err(e)).is_ok(),
            }

            let Some(children) = self.list().await else {
                return false;
            };
            let mut failed = 0usize;
            for child in &children {
                if !child.delete(true).await {
                    failed += 1;
                }
            }
            if failed > 0 {
                warn!(
                    "Could not delete {failed} of {} entries under {self}",
                    children.len()
                );
                return false;
            }

            let result = self.backend().remove_dir(&path).await;
            let removed = self.adapt("remove_dir", result).is_ok();
            if removed {
                info!("Deleted {self} recursively ({} children)", children.len());
            }
            removed
        }
        .boxed()
    }

    /// Copy this entry to `dest`.
    ///
    /// Copying onto itself succeeds without touching the backend. When `dest`
    /// exists and `overwrite` is off, it is deleted first (with `recursive`)
    /// and the copy proceeds into the cleared location. Files are read whole
    /// and written whole. Directories are created at `dest`; with
    /// `recursive` every child is copied by name and any child failure fails
    /// the whole copy. A recursive copy into its own subtree is refused.
    pub fn copy_to<'a>(
        &'a self,
        dest: &'a Handle,
        overwrite: bool,
        recursive: bool,
    ) -> BoxFuture<'a, bool> {
        async move {
            if self == dest {
                return true;
            }
            let Some(meta) = self.metadata().await else {
                return false;
            };
            if recursive && meta.is_dir() && refuse_into_subtree("copy", self, dest) {
                return false;
            }
            if !overwrite && dest.exists().await {
                dest.delete(recursive).await;
            }

            if !meta.is_dir() {
                let Some(bytes) = self.read_bytes().await else {
                    return false;
                };
                return dest.write(bytes).await;
            }

            if !dest.mkdir(true).await {
                return false;
            }
            if !recursive {
                return true;
            }

            let Some(names) = self.list_names().await else {
                return false;
            };
            let mut failed = 0usize;
            for name in &names {
                let target = dest.child(name);
                if !self.child(name).copy_to(&target, overwrite, true).await {
                    failed += 1;
                }
            }
            if failed > 0 {
                warn!(
                    "Could not copy {failed} of {} entries from {self} to {dest}",
                    names.len()
                );
                return false;
            }
            info!("Copied {self} to {dest} ({} children)", names.len());
            true
        }
        .boxed()
    }

    /// Move this entry to `dest` with a single backend rename.
    ///
    /// Renaming onto itself succeeds without touching the backend. When
    /// `dest` exists and `overwrite` is off, it is deleted first and the
    /// move is abandoned if that fails. With `recursive`, the destination's
    /// missing parent directories are created first. A move into this
    /// entry's own subtree is refused before anything is deleted.
    pub async fn rename_to(&self, dest: &Handle, overwrite: bool, recursive: bool) -> bool {
        if self == dest {
            return true;
        }
        if refuse_into_subtree("move", self, dest) {
            return false;
        }
        if !overwrite && dest.exists().await && !dest.delete(recursive).await {
            warn!("Could not clear {dest} before moving {self} there");
            return false;
        }
        if recursive {
            if let Some(parent) = dest.parent() {
                if !parent.mkdir(true).await {
                    return false;
                }
            }
        }
        let result = self.backend().rename(&self.os_path(), &dest.os_path()).await;
        self.adapt("rename", result).is_ok()
    }

    /// Empty this entry.
    ///
    /// A directory has each child deleted (recursively when `recursive`),
    /// and the result is the aggregate of those deletes. Anything else is
    /// truncated to zero bytes.
    pub async fn clear(&self, recursive: bool) -> bool {
        let Some(meta) = self.metadata().await else {
            return false;
        };
        if !meta.is_dir() {
            return self.write(b"").await;
        }

        let Some(children) = self.list().await else {
            return false;
        };
        let mut failed = 0usize;
        for child in &children {
            if !child.delete(recursive).await {
                failed += 1;
            }
        }
        if failed > 0 {
            warn!(
                "Could not clear {failed} of {} entries under {self}",
                children.len()
            );
            return false;
        }
        info!("Cleared {self} ({} entries)", children.len());
        true
    }
}
