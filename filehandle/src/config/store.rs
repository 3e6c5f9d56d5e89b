//! A JSON document persisted through a file handle.

use std::env;
use std::io::Write;

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::dotted;
use crate::error::{Error, Result};
use crate::handle::blocking::Handle;

/// An in-memory JSON object loaded from, and saved to, a file.
///
/// Values are addressed by dotted keys (`"editor.tab_width"`). Changes stay
/// in memory until [`JsonStore::save`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use filehandle::blocking::Handle;
/// use filehandle::config::JsonStore;
/// use filehandle::MemoryBackend;
///
/// let fs = Arc::new(MemoryBackend::new());
/// let mut store = JsonStore::open(Handle::new("/etc/app/settings.json", fs.clone()));
///
/// store.set("editor.tab_width", 4).unwrap();
/// store.save().unwrap();
///
/// let reopened = JsonStore::open(Handle::new("/etc/app/settings.json", fs));
/// assert_eq!(reopened.get_as::<u32>("editor.tab_width"), Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct JsonStore {
    handle: Handle,
    data: Value,
}

impl JsonStore {
    /// Bind a store to `handle` and load it.
    #[must_use]
    pub fn open(handle: Handle) -> Self {
        let mut store = Self::empty(handle);
        store.load();
        store
    }

    /// Bind a store to `handle` without reading it.
    #[must_use]
    pub fn empty(handle: Handle) -> Self {
        Self {
            handle,
            data: Value::Object(Map::new()),
        }
    }

    /// The file this store persists to.
    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// The whole document.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Replace the in-memory document with the file's contents.
    ///
    /// A missing, unreadable or malformed file, or one whose top level is not
    /// an object, leaves an empty document and returns `false`.
    pub fn load(&mut self) -> bool {
        match self.handle.read_json() {
            Some(Value::Object(map)) => {
                debug!("Loaded {} key(s) from {}", map.len(), self.handle);
                self.data = Value::Object(map);
                true
            }
            _ => {
                debug!("No usable JSON object at {}", self.handle);
                self.data = Value::Object(Map::new());
                false
            }
        }
    }

    /// The value at a dotted key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        dotted::get(&self.data, key)
    }

    /// The value at a dotted key, deserialized into `T`.
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Store a value at a dotted key, creating intermediate objects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a malformed key and
    /// [`Error::Json`] if `value` cannot be represented as JSON.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)?;
        dotted::set(&mut self.data, key, value)
    }

    /// Remove and return the value at a dotted key.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        dotted::remove(&mut self.data, key)
    }

    /// Apply overrides from environment variables named `{prefix}_{KEY}`.
    ///
    /// Double underscores in the rest of the name become dots and the key is
    /// lower-cased, so `APP_EDITOR__TAB_WIDTH=8` sets `editor.tab_width`.
    /// Values that parse as JSON are stored as such; anything else is stored
    /// as a string. Variables whose name or value is not valid Unicode are
    /// skipped. Returns the number of keys set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a variable maps to a malformed key.
    pub fn apply_env_overrides(&mut self, prefix: &str) -> Result<usize> {
        let marker = format!("{prefix}_");
        let mut overrides: Vec<(String, String)> = env::vars_os()
            .filter_map(|(name, value)| {
                let name = name.into_string().ok()?;
                let rest = name.strip_prefix(&marker)?;
                let Ok(value) = value.into_string() else {
                    debug!("Ignoring non-Unicode value of {name}");
                    return None;
                };
                Some((rest.to_lowercase().replace("__", "."), value))
            })
            .collect();
        overrides.sort();

        for (key, raw) in &overrides {
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
            dotted::set(&mut self.data, key, value)?;
        }
        Ok(overrides.len())
    }

    /// Write the document as pretty-printed JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened for writing or the write fails.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.handle.parent() {
            parent.mkdir(true);
        }
        let mut writer = self.handle.writer(false)?;
        serde_json::to_writer_pretty(&mut writer, &self.data)?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .map_err(|e| Error::from_io("write", self.handle.path().to_path_buf(), e))?;
        info!("Saved configuration to {}", self.handle);
        Ok(())
    }
}
