//! The deletion queue.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use futures::executor::block_on;
use log::{info, warn};
use parking_lot::Mutex;

use super::signal::{ListenerId, Signal, SignalSource};
use crate::handle::Handle;

#[derive(Debug, Clone)]
struct PendingDeletion {
    handle: Handle,
    recursive: bool,
}

struct Attachment {
    source: Weak<dyn SignalSource>,
    id: ListenerId,
}

impl Attachment {
    fn detach(self) {
        if let Some(source) = self.source.upgrade() {
            source.unsubscribe(self.id);
        }
    }
}

/// Handles queued for deletion at process exit.
///
/// At most one entry exists per full path; registering the same path again
/// replaces its `recursive` flag. [`CleanupRegistry::flush`] drains the queue,
/// so each entry is deleted at most once.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use filehandle::{CleanupRegistry, Handle, MemoryBackend};
///
/// let fs = Arc::new(MemoryBackend::new());
/// fs.insert_file("/tmp/scratch/data.bin", "...").unwrap();
///
/// let registry = CleanupRegistry::new();
/// Handle::new("/tmp/scratch", fs.clone()).delete_on_exit(&registry, true);
/// assert_eq!(registry.len(), 1);
///
/// assert!(registry.flush_blocking());
/// assert!(registry.is_empty());
/// assert_eq!(fs.entry_count(), 2); // root and /tmp
/// ```
#[derive(Default)]
pub struct CleanupRegistry {
    pending: Mutex<HashMap<String, PendingDeletion>>,
    attachment: Mutex<Option<Attachment>>,
}

impl CleanupRegistry {
    /// An empty registry, not attached to any signal source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `handle` for deletion.
    pub fn register(&self, handle: Handle, recursive: bool) {
        let key = handle.full_path();
        self.pending
            .lock()
            .insert(key, PendingDeletion { handle, recursive });
    }

    /// Drop `handle` from the queue. Returns `false` if it was not queued.
    pub fn unregister(&self, handle: &Handle) -> bool {
        self.pending.lock().remove(&handle.full_path()).is_some()
    }

    /// Number of queued paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Whether `handle`'s path is queued.
    #[must_use]
    pub fn contains(&self, handle: &Handle) -> bool {
        self.pending.lock().contains_key(&handle.full_path())
    }

    /// The `recursive` flag queued for `handle`, if any.
    #[must_use]
    pub fn recursive_flag(&self, handle: &Handle) -> Option<bool> {
        self.pending
            .lock()
            .get(&handle.full_path())
            .map(|entry| entry.recursive)
    }

    /// Delete everything queued and empty the queue.
    ///
    /// Deletions run one after another; a failed deletion does not stop the
    /// rest. Returns `true` when all of them succeeded.
    pub async fn flush(&self) -> bool {
        let drained: Vec<PendingDeletion> = {
            let mut pending = self.pending.lock();
            let mut entries: Vec<_> = pending.drain().map(|(_, entry)| entry).collect();
            entries.sort_by(|a, b| a.handle.path().cmp(b.handle.path()));
            entries
        };
        if drained.is_empty() {
            return true;
        }

        let total = drained.len();
        let mut failed = 0usize;
        for entry in drained {
            if !entry.handle.delete(entry.recursive).await {
                failed += 1;
            }
        }

        if failed > 0 {
            warn!("Exit cleanup could not delete {failed} of {total} path(s)");
        } else {
            info!("Exit cleanup deleted {total} path(s)");
        }
        failed == 0
    }

    /// [`CleanupRegistry::flush`] on the current thread.
    pub fn flush_blocking(&self) -> bool {
        block_on(self.flush())
    }

    /// Flush this registry when `source` delivers a signal.
    ///
    /// Any previous attachment is removed first, so the registry is never
    /// subscribed twice. On delivery the listener detaches itself and
    /// flushes. Ending the process is left to the source, so several
    /// registries on one source all flush before it exits.
    pub fn attach(self: &Arc<Self>, source: &Arc<dyn SignalSource>) {
        self.detach();

        let registry = Arc::downgrade(self);
        let weak_source = Arc::downgrade(source);
        let id = source.subscribe(Arc::new(move |_: Signal| {
            let Some(registry) = registry.upgrade() else {
                return;
            };
            registry.detach();
            registry.flush_blocking();
        }));

        *self.attachment.lock() = Some(Attachment {
            source: weak_source,
            id,
        });
    }

    /// Remove the signal listener installed by [`CleanupRegistry::attach`].
    ///
    /// Returns `false` if the registry was not attached.
    pub fn detach(&self) -> bool {
        let previous = self.attachment.lock().take();
        match previous {
            Some(attachment) => {
                attachment.detach();
                true
            }
            None => false,
        }
    }

    /// Whether a signal listener is installed.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attachment.lock().is_some()
    }
}

impl fmt::Debug for CleanupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupRegistry")
            .field("pending", &self.len())
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::cleanup::SignalHub;

    fn setup() -> (Arc<MemoryBackend>, Arc<CleanupRegistry>) {
        let fs = Arc::new(MemoryBackend::new());
        fs.insert_file("/scratch/a.tmp", "a").unwrap();
        fs.insert_file("/scratch/nested/b.tmp", "b").unwrap();
        (fs, Arc::new(CleanupRegistry::new()))
    }

    fn handle(fs: &Arc<MemoryBackend>, path: &str) -> Handle {
        Handle::resolve(path, &[], fs.clone())
    }

    #[test]
    fn test_register_overwrites_flag() {
        let (fs, registry) = setup();
        let dir = handle(&fs, "/scratch");
        registry.register(dir.clone(), false);
        registry.register(handle(&fs, "/scratch/"), true);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.recursive_flag(&dir), Some(true));
    }

    #[test]
    fn test_flush_deletes_and_clears_once() {
        let (fs, registry) = setup();
        handle(&fs, "/scratch/a.tmp").delete_on_exit(&registry, false);
        handle(&fs, "/scratch/nested").delete_on_exit(&registry, true);

        assert!(registry.flush_blocking());
        assert!(registry.is_empty());
        assert!(!fs.contains_path("/scratch/a.tmp"));
        assert!(!fs.contains_path("/scratch/nested"));

        // Nothing left to do on a second flush.
        assert!(registry.flush_blocking());
    }

    #[test]
    fn test_flush_reports_failures_but_attempts_all() {
        let (fs, registry) = setup();
        handle(&fs, "/scratch/nested").delete_on_exit(&registry, false);
        handle(&fs, "/scratch/a.tmp").delete_on_exit(&registry, false);

        assert!(!registry.flush_blocking());
        assert!(!fs.contains_path("/scratch/a.tmp"));
        assert!(fs.contains_path("/scratch/nested"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister() {
        let (fs, registry) = setup();
        let file = handle(&fs, "/scratch/a.tmp");
        file.delete_on_exit(&registry, false);
        assert!(registry.contains(&file));
        assert!(registry.unregister(&file));
        assert!(!registry.unregister(&file));
    }

    #[test]
    fn test_interrupt_flushes_then_terminates() {
        let (fs, registry) = setup();
        let codes = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&codes);
        let hub = Arc::new(SignalHub::with_exit(move |code| seen.lock().push(code)));
        let source: Arc<dyn SignalSource> = hub.clone();

        handle(&fs, "/scratch").delete_on_exit(&registry, true);
        registry.attach(&source);
        assert!(registry.is_attached());

        hub.emit(Signal::Interrupt);
        assert!(!fs.contains_path("/scratch"));
        assert_eq!(*codes.lock(), vec![130]);
        assert!(!registry.is_attached());
        assert_eq!(hub.listener_count(), 0);

        // Detached: a second signal only terminates.
        fs.insert_file("/scratch/again.tmp", "x").unwrap();
        hub.emit(Signal::Terminate);
        assert!(fs.contains_path("/scratch/again.tmp"));
        assert_eq!(*codes.lock(), vec![130, 143]);
    }

    #[test]
    fn test_exit_flushes_without_terminating() {
        let (fs, registry) = setup();
        let codes = Arc::new(Mutex::new(Vec::<i32>::new()));
        let seen = Arc::clone(&codes);
        let hub = Arc::new(SignalHub::with_exit(move |code| seen.lock().push(code)));
        let source: Arc<dyn SignalSource> = hub.clone();

        handle(&fs, "/scratch/a.tmp").delete_on_exit(&registry, false);
        registry.attach(&source);
        drop(hub.exit_guard());

        assert!(!fs.contains_path("/scratch/a.tmp"));
        assert!(codes.lock().is_empty());
    }

    #[test]
    fn test_reattach_replaces_listener() {
        let (_, registry) = setup();
        let hub = Arc::new(SignalHub::with_exit(|_| {}));
        let source: Arc<dyn SignalSource> = hub.clone();

        registry.attach(&source);
        registry.attach(&source);
        assert_eq!(hub.listener_count(), 1);

        assert!(registry.detach());
        assert_eq!(hub.listener_count(), 0);
        assert!(!registry.detach());
    }
}
