//! JSON configuration persistence over file handles.
//!
//! This module provides:
//! - [`dotted`]: get/set/remove on nested JSON objects by dotted key
//! - [`JsonStore`]: a document loaded from and saved to a [`Handle`]
//!
//! # Precedence
//!
//! A store starts from the file's contents. [`JsonStore::apply_env_overrides`]
//! layers environment variables on top, and [`JsonStore::set`] wins over both
//! until the next [`JsonStore::load`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use filehandle::blocking::Handle;
//! use filehandle::config::JsonStore;
//! use filehandle::MemoryBackend;
//!
//! let fs = Arc::new(MemoryBackend::new());
//! fs.insert_file("/app/config.json", r#"{"log": {"level": "info"}}"#).unwrap();
//!
//! let mut store = JsonStore::open(Handle::new("/app/config.json", fs));
//! assert_eq!(store.get_as::<String>("log.level").as_deref(), Some("info"));
//!
//! store.set("log.level", "debug").unwrap();
//! assert_eq!(store.get("log.level").unwrap(), "debug");
//! ```
//!
//! [`Handle`]: crate::blocking::Handle

pub mod dotted;
mod store;

pub use store::JsonStore;
