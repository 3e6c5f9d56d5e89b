//! Path arithmetic on canonical segment lists.
//!
//! # Key Concepts
//!
//! ## Normalization
//!
//! A raw string path is resolved against a base (by default the process
//! working directory) into an ordered list of segments:
//! - Leading `/` or `\` roots the path and ignores the base
//! - A `C:\` prefix roots the path at drive `C:`
//! - `.` and empty tokens vanish, `..` pops a segment (stopping at the root)
//! - Both `/` and `\` separate tokens
//!
//! ## Canonical paths
//!
//! [`CanonicalPath`] owns the resulting segment list. Names, extensions,
//! parents and URLs are computed from the segments alone, without touching
//! any filesystem.
//!
//! # Examples
//!
//! ```
//! use filehandle::path::{CanonicalPath, PathRelationship};
//!
//! let project = CanonicalPath::resolve("/home/user/project", &[]);
//! let source = project.join(&["src", "main.rs"]);
//!
//! assert!(project.contains(&source));
//! assert_eq!(source.relationship(&project), PathRelationship::Descendant);
//! assert_eq!(source.extension(), Some("rs"));
//! ```

pub mod normalize;
pub mod relationship;
mod segments;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types
pub use normalize::{default_base, normalize};
pub use relationship::PathRelationship;
pub use segments::CanonicalPath;
