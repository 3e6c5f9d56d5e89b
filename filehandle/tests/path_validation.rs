//! Integration tests for path normalization and path arithmetic on handles.
//!
//! This test suite verifies that:
//! - Raw strings normalize the same way whatever separator they use
//! - Rooted and drive-rooted paths ignore the base
//! - Derived handles (children, parents, joins) are themselves canonical
//! - Containment and relationships are strict and purely lexical
//!
//! None of these tests should reach the backend, so they all run against a
//! recording backend and assert that it saw no calls.

mod common;

use common::RecordingBackend;
use filehandle::path::normalize::{normalize, render};
use filehandle::{CanonicalPath, Handle, PathRelationship};

fn base(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn test_parent_tokens_stop_at_root() {
    assert_eq!(normalize("/../../x", &base(&["a", "b"])), ["x"]);
    assert!(normalize("..", &[]).is_empty());
    assert!(normalize("/a/../..", &base(&["q"])).is_empty());
}

#[test]
fn test_drive_path_ignores_base() {
    assert_eq!(normalize(r"C:\a\b", &base(&["x", "y"])), ["C:", "a", "b"]);
    assert_eq!(normalize("C:/a/../b", &base(&["x"])), ["C:", "b"]);
    // Without a separator after the colon this is an ordinary name.
    assert_eq!(normalize("C:a", &base(&["x"])), ["x", "C:a"]);
}

#[test]
fn test_mixed_separators_agree() {
    let expected = normalize("/srv/data/file.txt", &[]);
    assert_eq!(normalize(r"\srv\data\file.txt", &[]), expected);
    assert_eq!(normalize(r"/srv\data//./file.txt", &[]), expected);
}

#[test]
fn test_relative_resolves_against_base_copy() {
    let b = base(&["home", "user"]);
    assert_eq!(normalize("./docs/../notes", &b), ["home", "user", "notes"]);
    assert_eq!(b, ["home", "user"]);
}

#[test]
fn test_render_uses_requested_separator() {
    let segments = normalize(r"C:\Program Files\app", &[]);
    assert_eq!(render(&segments, '\\'), r"C:\Program Files\app");
    assert_eq!(render(&normalize("/a/b", &[]), '/'), "/a/b");
}

// =============================================================================
// Handle arithmetic
// =============================================================================

#[test]
fn test_handle_derivation_is_pure() {
    let backend = RecordingBackend::new();
    let project = Handle::resolve("/home/user/project", &[], backend.clone());

    let source = project.to(&["src", "..", "src", "./lib.rs"]);
    assert_eq!(source.segments(), ["home", "user", "project", "src", "lib.rs"]);
    assert_eq!(source.name(), Some("lib.rs"));
    assert_eq!(source.stem(), Some("lib"));
    assert_eq!(source.extension(), Some("rs"));
    assert_eq!(source.parent().unwrap().name(), Some("src"));
    // Children are appended verbatim, unlike joins.
    assert_eq!(project.child("a..b").name(), Some("a..b"));

    assert!(backend.calls().is_empty());
}

#[test]
fn test_parent_chain_ends_at_root() {
    let backend = RecordingBackend::new();
    let mut current = Some(Handle::resolve("/a/b/c", &[], backend));
    let mut depth = 0;
    while let Some(handle) = current {
        current = handle.parent();
        depth += 1;
    }
    // c, b, a and the root.
    assert_eq!(depth, 4);
}

#[test]
fn test_hidden_and_extensionless_names() {
    let backend = RecordingBackend::new();
    let dotfile = Handle::resolve("/home/u/.bashrc", &[], backend.clone());
    assert!(dotfile.is_hidden());
    assert_eq!(dotfile.extension(), None);
    assert_eq!(dotfile.stem(), Some(".bashrc"));

    let archive = Handle::resolve("/tmp/data.tar.gz", &[], backend);
    assert!(!archive.is_hidden());
    assert_eq!(archive.extension(), Some("gz"));
    assert_eq!(archive.stem(), Some("data.tar"));
}

// =============================================================================
// Containment
// =============================================================================

#[test]
fn test_contains_is_strict_and_segment_wise() {
    let backend = RecordingBackend::new();
    let a = Handle::resolve("/a", &[], backend.clone());
    let ab = Handle::resolve("/a/b", &[], backend.clone());
    let abc = Handle::resolve("/abc", &[], backend.clone());
    let root = Handle::resolve("/", &[], backend.clone());

    assert!(a.contains(&ab));
    assert!(!ab.contains(&a));
    assert!(!a.contains(&a));
    assert!(!a.contains(&abc));
    assert!(root.contains(&a));
    assert!(!root.contains(&root));
    assert!(backend.calls().is_empty());
}

#[test]
fn test_relationships() {
    let project = CanonicalPath::resolve("/work/project", &[]);
    let nested = CanonicalPath::resolve("/work/project/src/main.rs", &[]);
    let sibling = CanonicalPath::resolve("/work/other", &[]);

    assert_eq!(project.relationship(&nested), PathRelationship::Ancestor);
    assert_eq!(nested.relationship(&project), PathRelationship::Descendant);
    assert_eq!(project.relationship(&project.clone()), PathRelationship::Same);
    assert_eq!(project.relationship(&sibling), PathRelationship::Unrelated);
    assert!(PathRelationship::is_within(&nested, &project));
    assert!(!PathRelationship::is_within(&sibling, &project));
}

#[test]
fn test_equality_is_by_segments() {
    let backend = RecordingBackend::new();
    let one = Handle::resolve(r"/x\y/./z", &[], backend.clone());
    let two = Handle::resolve("z", &base(&["x", "y"]), backend);
    assert_eq!(one, two);
}

#[test]
fn test_uri_escapes_segments() {
    let backend = RecordingBackend::new();
    let handle = Handle::resolve("/tmp/with space/#hash", &[], backend);
    assert_eq!(
        handle.uri().map(String::from).as_deref(),
        Some("file:///tmp/with%20space/%23hash")
    );
}
