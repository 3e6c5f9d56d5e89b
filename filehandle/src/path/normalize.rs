//! Path normalization functions.
//!
//! Normalization turns a raw path string into an ordered list of segments:
//! - A leading `/` or `\` makes the path rooted and discards the base
//! - A leading drive prefix (`C:\`) discards the base and becomes the first
//!   segment
//! - Anything else is resolved against the base segments
//! - `.` and empty tokens are dropped, `..` pops one segment (never past root)

use std::env;
use std::sync::OnceLock;

/// Returns `true` for either separator accepted in raw paths.
#[must_use]
pub const fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Detect a drive-letter-absolute prefix such as `C:\` (or `C:/`).
///
/// Returns the two-character drive segment (e.g. `"C:"`).
///
/// # Examples
///
/// ```
/// use filehandle::path::normalize::drive_prefix;
///
/// assert_eq!(drive_prefix(r"C:\Users"), Some("C:"));
/// assert_eq!(drive_prefix("d:/data"), Some("d:"));
/// assert_eq!(drive_prefix("C:relative"), None);
/// assert_eq!(drive_prefix("/root"), None);
/// ```
#[must_use]
pub fn drive_prefix(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && is_separator(bytes[2] as char)
    {
        Some(&raw[..2])
    } else {
        None
    }
}

/// Returns `true` if `segment` is a drive segment such as `C:`.
#[must_use]
pub fn is_drive_segment(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Resolve a raw path string against `base`, producing canonical segments.
///
/// The base is copied, never modified.
///
/// # Examples
///
/// ```
/// use filehandle::path::normalize::normalize;
///
/// let base = vec!["home".to_string(), "user".to_string()];
///
/// assert_eq!(normalize("docs/./a.txt", &base), ["home", "user", "docs", "a.txt"]);
/// assert_eq!(normalize("../other", &base), ["home", "other"]);
/// assert_eq!(normalize("/../../x", &base), ["x"]);
/// assert_eq!(normalize(r"C:\a\b", &base), ["C:", "a", "b"]);
/// ```
#[must_use]
pub fn normalize(raw: &str, base: &[String]) -> Vec<String> {
    let (mut segments, rest) = if raw.starts_with(is_separator) {
        (Vec::new(), raw)
    } else if let Some(drive) = drive_prefix(raw) {
        (vec![drive.to_string()], &raw[3..])
    } else {
        (base.to_vec(), raw)
    };

    for token in rest.split(is_separator) {
        match token {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name.to_string()),
        }
    }

    segments
}

/// Render canonical segments back to a path string using `separator`.
///
/// Rooted paths get a leading separator; drive-rooted paths start with the
/// drive segment instead. The empty sequence renders as the separator alone.
///
/// # Examples
///
/// ```
/// use filehandle::path::normalize::render;
///
/// let segs = |s: &[&str]| s.iter().map(|s| s.to_string()).collect::<Vec<_>>();
///
/// assert_eq!(render(&segs(&[]), '/'), "/");
/// assert_eq!(render(&segs(&["a", "b"]), '/'), "/a/b");
/// assert_eq!(render(&segs(&["C:", "a"]), '\\'), r"C:\a");
/// assert_eq!(render(&segs(&["C:"]), '\\'), r"C:\");
/// ```
#[must_use]
pub fn render(segments: &[String], separator: char) -> String {
    let sep = separator.to_string();
    match segments.first() {
        None => sep,
        Some(first) if is_drive_segment(first) => {
            if segments.len() == 1 {
                format!("{first}{sep}")
            } else {
                segments.join(&sep)
            }
        }
        Some(_) => format!("{sep}{}", segments.join(&sep)),
    }
}

/// The process-wide default base: the working directory at first use,
/// itself passed through [`normalize`].
///
/// Falls back to the root if the working directory cannot be read.
pub fn default_base() -> &'static [String] {
    static BASE: OnceLock<Vec<String>> = OnceLock::new();
    BASE.get_or_init(|| match env::current_dir() {
        Ok(cwd) => normalize(&cwd.to_string_lossy(), &[]),
        Err(e) => {
            log::warn!("cannot read current directory, using root as base: {e}");
            Vec::new()
        }
    })
}
