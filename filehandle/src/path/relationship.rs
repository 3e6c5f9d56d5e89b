//! Path relationship checking.
//!
//! This module determines how two canonical paths relate in the hierarchy.
//! Comparison is purely positional on segments: no case folding and no
//! separator translation.

use super::segments::CanonicalPath;

/// Relationship between two paths.
///
/// # Examples
///
/// ```
/// use filehandle::path::{CanonicalPath, PathRelationship};
///
/// let parent = CanonicalPath::resolve("/home/user", &[]);
/// let child = CanonicalPath::resolve("/home/user/project", &[]);
///
/// assert_eq!(
///     PathRelationship::between(&parent, &child),
///     PathRelationship::Ancestor
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRelationship {
    /// The first path is an ancestor of the second.
    Ancestor,

    /// The first path is a descendant of the second.
    Descendant,

    /// The paths have identical segments.
    Same,

    /// Neither path is an ancestor or descendant of the other.
    Unrelated,
}

impl PathRelationship {
    /// Determine the relationship between two paths.
    ///
    /// # Examples
    ///
    /// ```
    /// use filehandle::path::{CanonicalPath, PathRelationship};
    ///
    /// let a = CanonicalPath::resolve("/a", &[]);
    /// let ab = CanonicalPath::resolve("/a/b", &[]);
    /// let b = CanonicalPath::resolve("/b", &[]);
    ///
    /// assert_eq!(PathRelationship::between(&a, &ab), PathRelationship::Ancestor);
    /// assert_eq!(PathRelationship::between(&ab, &a), PathRelationship::Descendant);
    /// assert_eq!(PathRelationship::between(&a, &a), PathRelationship::Same);
    /// assert_eq!(PathRelationship::between(&a, &b), PathRelationship::Unrelated);
    /// ```
    #[must_use]
    pub fn between(path1: &CanonicalPath, path2: &CanonicalPath) -> Self {
        if path1 == path2 {
            Self::Same
        } else if path1.contains(path2) {
            Self::Ancestor
        } else if path2.contains(path1) {
            Self::Descendant
        } else {
            Self::Unrelated
        }
    }

    /// Check if `path` is `directory` or lies below it.
    ///
    /// [`Handle::copy_to`] and [`Handle::rename_to`] use this to refuse a
    /// destination inside the source tree.
    ///
    /// [`Handle::copy_to`]: crate::Handle::copy_to
    /// [`Handle::rename_to`]: crate::Handle::rename_to
    #[must_use]
    pub fn is_within(path: &CanonicalPath, directory: &CanonicalPath) -> bool {
        matches!(
            Self::between(path, directory),
            Self::Descendant | Self::Same
        )
    }

    /// Get a human-readable description of the relationship.
    #[must_use]
    pub fn description(&self, path1: &CanonicalPath, path2: &CanonicalPath) -> String {
        match self {
            Self::Ancestor => format!("{path1} is an ancestor of {path2}"),
            Self::Descendant => format!("{path1} is a descendant of {path2}"),
            Self::Same => format!("{path1} and {path2} are the same path"),
            Self::Unrelated => format!("{path1} and {path2} are unrelated paths"),
        }
    }
}
