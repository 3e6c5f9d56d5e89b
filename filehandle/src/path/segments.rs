//! The canonical, segment-addressed path value.

use std::fmt;
use std::path::{PathBuf, MAIN_SEPARATOR};

use url::Url;

use super::normalize::{default_base, normalize, render};
use super::relationship::PathRelationship;

/// An ordered list of path segments with no empty, `.` or `..` entries.
///
/// The empty list is the filesystem root. On volume-letter systems the drive
/// (`C:`) is stored as the first segment. Every derived path (parent, child,
/// join) is a fresh value; segments are never shared mutably.
///
/// # Examples
///
/// ```
/// use filehandle::path::CanonicalPath;
///
/// let base = CanonicalPath::from_segments(vec!["srv".into(), "app".into()]);
/// let path = CanonicalPath::resolve("logs/../data/report.tar.gz", base.segments());
///
/// assert_eq!(path.segments(), ["srv", "app", "data", "report.tar.gz"]);
/// assert_eq!(path.name(), Some("report.tar.gz"));
/// assert_eq!(path.extension(), Some("gz"));
/// assert!(base.contains(&path));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CanonicalPath {
    segments: Vec<String>,
}

impl CanonicalPath {
    /// The filesystem root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Normalize `raw` against the process-wide default base (the working
    /// directory at first use).
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self::resolve(raw, default_base())
    }

    /// Normalize `raw` against an explicit base.
    #[must_use]
    pub fn resolve(raw: &str, base: &[String]) -> Self {
        Self {
            segments: normalize(raw, base),
        }
    }

    /// Wrap already-canonical segments.
    ///
    /// The segments are taken as-is and not re-normalized; callers are
    /// trusted to pass a clean list.
    #[must_use]
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// The ordered segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (0 for the root).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the filesystem root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path rendered with the platform separator.
    #[must_use]
    pub fn full_path(&self) -> String {
        render(&self.segments, MAIN_SEPARATOR)
    }

    /// The path as a [`PathBuf`], suitable for handing to a backend.
    #[must_use]
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(self.full_path())
    }

    /// The last segment, or `None` for the root.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The name without its extension.
    ///
    /// Dot-files such as `.bashrc` keep their full name as the stem.
    #[must_use]
    pub fn stem(&self) -> Option<&str> {
        let name = self.name()?;
        Some(split_extension(name).map_or(name, |(stem, _)| stem))
    }

    /// Text after the last `.` of the name.
    ///
    /// `None` for the root, names without a dot, and dot-files without a
    /// second dot.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        split_extension(self.name()?).map(|(_, ext)| ext)
    }

    /// Whether the name marks a hidden entry (leading `.`).
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name().is_some_and(|name| name.starts_with('.'))
    }

    /// The parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self::from_segments(rest.to_vec()))
    }

    /// Append raw parts by string concatenation and re-normalize.
    ///
    /// Because the result is re-normalized, `..` in `parts` walks upward and a
    /// part with separators adds several segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use filehandle::path::CanonicalPath;
    ///
    /// let dir = CanonicalPath::resolve("/var/log", &[]);
    /// assert_eq!(dir.join(&["nginx", "access.log"]).segments(), ["var", "log", "nginx", "access.log"]);
    /// assert_eq!(dir.join(&["../lib"]).segments(), ["var", "lib"]);
    /// ```
    #[must_use]
    pub fn join<S: AsRef<str>>(&self, parts: &[S]) -> Self {
        let sep = MAIN_SEPARATOR.to_string();
        let tail = parts.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(&sep);
        let raw = format!("{}{sep}{tail}", self.full_path());
        Self::resolve(&raw, &[])
    }

    /// A direct child named `name`, without re-normalization.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self::from_segments(segments)
    }

    /// True iff `other` lies strictly below this path.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.segments.len() > self.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a == b)
    }

    /// How this path relates to `other`.
    #[must_use]
    pub fn relationship(&self, other: &Self) -> PathRelationship {
        PathRelationship::between(self, other)
    }

    /// A `file://` URL for this path, segments percent-encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use filehandle::path::CanonicalPath;
    ///
    /// let path = CanonicalPath::resolve("/tmp/my file.txt", &[]);
    /// assert_eq!(path.uri().unwrap().as_str(), "file:///tmp/my%20file.txt");
    /// ```
    #[must_use]
    pub fn uri(&self) -> Option<Url> {
        let mut url = Url::parse("file:///").ok()?;
        {
            let mut path = url.path_segments_mut().ok()?;
            path.pop_if_empty().extend(&self.segments);
        }
        Some(url)
    }
}

fn split_extension(name: &str) -> Option<(&str, &str)> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => Some((stem, ext)),
        _ => None,
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

impl From<Vec<String>> for CanonicalPath {
    fn from(segments: Vec<String>) -> Self {
        Self::from_segments(segments)
    }
}
