//! Termination signal sources.

use std::collections::BTreeMap;
use std::fmt;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use crate::error::Result;

/// A process lifecycle event that should flush pending deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Interactive interrupt (Ctrl-C).
    Interrupt,
    /// Termination request.
    Terminate,
    /// Normal process exit.
    Exit,
}

impl Signal {
    /// The conventional exit status after this signal, if it should end the
    /// process.
    ///
    /// ```
    /// use filehandle::cleanup::Signal;
    ///
    /// assert_eq!(Signal::Interrupt.exit_code(), Some(130));
    /// assert_eq!(Signal::Terminate.exit_code(), Some(143));
    /// assert_eq!(Signal::Exit.exit_code(), None);
    /// ```
    #[must_use]
    pub const fn exit_code(self) -> Option<i32> {
        match self {
            Self::Interrupt => Some(130),
            Self::Terminate => Some(143),
            Self::Exit => None,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => write!(f, "interrupt"),
            Self::Terminate => write!(f, "terminate"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

/// A callback run when a [`Signal`] is delivered.
pub type Listener = Arc<dyn Fn(Signal) + Send + Sync>;

/// Token returned by [`SignalSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Something that delivers lifecycle signals to subscribed listeners.
///
/// Listeners only react to a signal. Ending the process belongs to the
/// source, once, after every listener has run.
pub trait SignalSource: Send + Sync {
    /// Register `listener`; it runs for every signal until unsubscribed.
    fn subscribe(&self, listener: Listener) -> ListenerId;

    /// Remove a listener. Returns `false` if it was not subscribed.
    fn unsubscribe(&self, id: ListenerId) -> bool;

    /// End the process with `code` after every listener has handled a
    /// terminating signal.
    fn terminate(&self, code: i32) {
        process::exit(code);
    }
}

type ExitFn = Box<dyn Fn(i32) + Send + Sync>;

/// The standard [`SignalSource`].
///
/// Signals come from three places: [`SignalHub::emit`] for explicit
/// delivery, [`SignalHub::install_ctrlc`] for Ctrl-C and termination
/// requests, and [`SignalHub::exit_guard`] for normal exit.
pub struct SignalHub {
    listeners: Mutex<BTreeMap<ListenerId, Listener>>,
    next_id: AtomicU64,
    exit: Option<ExitFn>,
}

impl Default for SignalHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalHub {
    /// A hub that ends the process with `std::process::exit`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(0),
            exit: None,
        }
    }

    /// A hub that calls `exit` instead of ending the process.
    #[must_use]
    pub fn with_exit(exit: impl Fn(i32) + Send + Sync + 'static) -> Self {
        Self {
            exit: Some(Box::new(exit)),
            ..Self::new()
        }
    }

    /// Deliver `signal` to every current listener, in subscription order,
    /// then end the process if the signal carries an exit code.
    ///
    /// Listeners are cloned out before being called, so a listener may
    /// unsubscribe itself. Termination happens even with no listeners.
    pub fn emit(&self, signal: Signal) {
        let listeners: Vec<Listener> = self.listeners.lock().values().cloned().collect();
        debug!("Delivering {signal} to {} listener(s)", listeners.len());
        for listener in listeners {
            listener(signal);
        }
        if let Some(code) = signal.exit_code() {
            self.terminate(code);
        }
    }

    /// Number of subscribed listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Route Ctrl-C and termination requests to [`Signal::Interrupt`].
    ///
    /// Only one such handler can exist per process.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Signal`] if a handler is already installed or
    /// the platform refuses one.
    pub fn install_ctrlc(self: &Arc<Self>) -> Result<()> {
        let hub = Arc::clone(self);
        ctrlc::set_handler(move || hub.emit(Signal::Interrupt))?;
        Ok(())
    }

    /// A guard that delivers [`Signal::Exit`] when dropped.
    ///
    /// Hold it in `main` so pending deletions are flushed on normal return.
    #[must_use]
    pub fn exit_guard(self: &Arc<Self>) -> ExitGuard {
        ExitGuard {
            hub: Arc::clone(self),
        }
    }
}

impl SignalSource for SignalHub {
    fn subscribe(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().insert(id, listener);
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.lock().remove(&id).is_some()
    }

    fn terminate(&self, code: i32) {
        match &self.exit {
            Some(exit) => exit(code),
            None => process::exit(code),
        }
    }
}

impl fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalHub")
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

/// Delivers [`Signal::Exit`] to its hub on drop.
#[derive(Debug)]
pub struct ExitGuard {
    hub: Arc<SignalHub>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.hub.emit(Signal::Exit);
    }
}
