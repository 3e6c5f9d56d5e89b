//! Deferred deletion at process exit.
//!
//! A [`CleanupRegistry`] is an ordinary value owned by the application. It
//! only reacts to signals once [`CleanupRegistry::attach`] connects it to a
//! [`SignalSource`], usually a [`SignalHub`] wired to Ctrl-C and to an
//! [`ExitGuard`] held in `main`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use filehandle::cleanup::{CleanupRegistry, SignalHub, SignalSource};
//!
//! # fn main() -> filehandle::Result<()> {
//! let hub = Arc::new(SignalHub::new());
//! hub.install_ctrlc()?;
//! let _guard = hub.exit_guard();
//!
//! let registry = Arc::new(CleanupRegistry::new());
//! let source: Arc<dyn SignalSource> = hub.clone();
//! registry.attach(&source);
//! # Ok(())
//! # }
//! ```

mod registry;
mod signal;

pub use registry::CleanupRegistry;
pub use signal::{ExitGuard, Listener, ListenerId, Signal, SignalHub, SignalSource};
