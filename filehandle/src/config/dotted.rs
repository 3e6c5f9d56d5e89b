//! Dotted-key access into JSON objects.
//!
//! A key such as `server.tls.port` names a path through nested objects.
//! Arrays are not indexed; a dotted segment always names an object member.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Split a dotted key into its parts, rejecting empty keys and empty parts.
///
/// # Errors
///
/// Returns [`Error::Configuration`] for keys like `""`, `"a..b"` or `".a"`.
///
/// # Examples
///
/// ```
/// use filehandle::config::dotted::split_key;
///
/// assert_eq!(split_key("a.b.c").unwrap(), ["a", "b", "c"]);
/// assert!(split_key("a..b").is_err());
/// ```
pub fn split_key(key: &str) -> Result<Vec<&str>> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(Error::Configuration {
            key: key.to_string(),
            message: "dotted keys must not contain empty segments".to_string(),
        });
    }
    Ok(parts)
}

/// Look up `key` in `root`. Missing members and non-object intermediates
/// both give `None`.
#[must_use]
pub fn get<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    let parts = split_key(key).ok()?;
    parts
        .iter()
        .try_fold(root, |node, part| node.as_object()?.get(*part))
}

/// Store `value` at `key`, creating intermediate objects as needed.
///
/// An intermediate that exists but is not an object is replaced by one. A
/// non-object `root` is replaced by an empty object first.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if `key` is malformed.
pub fn set(root: &mut Value, key: &str, value: Value) -> Result<()> {
    let parts = split_key(key)?;
    set_in(root, &parts, value);
    Ok(())
}

fn set_in(node: &mut Value, parts: &[&str], value: Value) {
    let Some((first, rest)) = parts.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let child = map.entry(*first).or_insert(Value::Null);
        set_in(child, rest, value);
    }
}

/// Remove and return the value at `key`.
pub fn remove(root: &mut Value, key: &str) -> Option<Value> {
    let parts = split_key(key).ok()?;
    let (last, parents) = parts.split_last()?;
    let mut node = root.as_object_mut()?;
    for part in parents {
        node = node.get_mut(*part)?.as_object_mut()?;
    }
    node.remove(*last)
}
