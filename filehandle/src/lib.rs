#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # filehandle
//!
//! Path-addressed file handles over a pluggable filesystem backend.
//!
//! A [`Handle`] pairs a canonical path with a shared [`Backend`]. Path
//! arithmetic (normalization, parents, joins, containment) is pure and never
//! touches the backend; every filesystem query or action is forwarded to it.
//! Ordinary failures come back as `None`/`false` sentinels and are logged
//! through the `log` facade.
//!
//! ## Core Types
//!
//! - [`CanonicalPath`] and [`PathRelationship`]: segment-list paths
//! - [`Handle`] (async) and [`blocking::Handle`]: file handles
//! - [`Backend`], [`OsBackend`], [`MemoryBackend`]: filesystem capabilities
//! - [`CleanupRegistry`] and [`SignalHub`]: delete-on-exit support
//! - [`config::JsonStore`]: dotted-key JSON configuration files
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//! use filehandle::blocking::Handle;
//! use filehandle::MemoryBackend;
//!
//! let fs = Arc::new(MemoryBackend::new());
//! let project = Handle::new("/srv/project", fs);
//! assert!(project.mkdir(true));
//!
//! let readme = project.to(&["docs", "..", "README.md"]);
//! assert_eq!(readme.segments(), ["srv", "project", "README.md"]);
//! assert!(readme.write("Hello,"));
//! assert!(readme.append(" world!"));
//! assert_eq!(readme.read_text().as_deref(), Some("Hello, world!"));
//!
//! assert!(project.contains(&readme));
//! assert!(project.delete(true));
//! assert!(!readme.exists());
//! ```

pub mod backend;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod handle;
pub mod logging;
pub mod path;
mod traversal;

pub use handle::blocking;

// Re-export key types at crate root for convenience
pub use backend::{AccessMode, Backend, FileKind, MemoryBackend, Metadata, OsBackend};
pub use cleanup::{CleanupRegistry, Signal, SignalHub, SignalSource};
pub use error::{Error, Result};
pub use handle::Handle;
pub use logging::{init_logger, LogLevel, Logger};
pub use path::{CanonicalPath, PathRelationship};
