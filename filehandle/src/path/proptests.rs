//! Property-based tests for path handling.
//!
//! Note: The normalize and relationship modules carry light property tests of
//! their own. This suite runs many more cases and mixes separators, drive
//! prefixes and derived-path operations.

use super::normalize::{normalize, render};
use super::relationship::PathRelationship;
use super::segments::CanonicalPath;
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_ .-]{1,12}".prop_filter("not a dot token", |s| s != "." && s != "..")
}

fn canonical_strategy() -> impl Strategy<Value = CanonicalPath> {
    prop::collection::vec(segment_strategy(), 0..8).prop_map(CanonicalPath::from_segments)
}

fn raw_token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => segment_strategy(),
        1 => Just(".".to_string()),
        1 => Just("..".to_string()),
        1 => Just(String::new()),
    ]
}

fn separator_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("/"), Just("\\"), Just("//"), Just("/\\")]
}

fn raw_path_strategy() -> impl Strategy<Value = String> {
    (
        prop::option::of(prop_oneof![Just("/"), Just("\\"), Just("C:\\")]),
        prop::collection::vec((raw_token_strategy(), separator_strategy()), 0..10),
    )
        .prop_map(|(prefix, tokens)| {
            let mut raw = prefix.unwrap_or_default().to_string();
            for (token, sep) in tokens {
                raw.push_str(&token);
                raw.push_str(sep);
            }
            raw
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 10000,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    // Rendering and re-normalizing any normalized path gives it back
    #[test]
    fn normalization_idempotent(raw in raw_path_strategy(), base in canonical_strategy()) {
        let once = normalize(&raw, base.segments());
        let rendered = render(&once, '/');
        let twice = normalize(&rendered, &[]);
        prop_assert_eq!(once, twice);
    }

    // Normalized segments never contain separators or dot tokens
    #[test]
    fn normalized_segments_clean(raw in raw_path_strategy(), base in canonical_strategy()) {
        for segment in normalize(&raw, base.segments()) {
            prop_assert!(!segment.is_empty());
            prop_assert!(segment != "." && segment != "..");
            prop_assert!(!segment.contains('/') && !segment.contains('\\'));
        }
    }

    // The parent of a non-root path is its only depth-1 ancestor
    #[test]
    fn parent_is_direct_ancestor(path in canonical_strategy()) {
        match path.parent() {
            None => prop_assert!(path.is_root()),
            Some(parent) => {
                prop_assert_eq!(parent.depth() + 1, path.depth());
                prop_assert!(parent.contains(&path));
            }
        }
    }

    // Joining plain names yields a path contained in the original
    #[test]
    fn join_stays_below(path in canonical_strategy(), parts in prop::collection::vec(segment_strategy(), 1..4)) {
        let joined = path.join(&parts);
        prop_assert!(path.contains(&joined));
        prop_assert_eq!(joined.depth(), path.depth() + parts.len());
    }

    // Containment is transitive
    #[test]
    fn containment_transitive(base in canonical_strategy(), d1 in 1..4usize, d2 in 1..4usize) {
        let mut b = base.clone();
        for i in 0..d1 {
            b = b.child(&format!("sub{i}"));
        }
        let mut c = b.clone();
        for i in 0..d2 {
            c = c.child(&format!("deep{i}"));
        }
        prop_assert!(base.contains(&b));
        prop_assert!(b.contains(&c));
        prop_assert!(base.contains(&c));
    }

    // Exactly one relationship holds for any pair
    #[test]
    fn relationship_mutually_exclusive(p1 in canonical_strategy(), p2 in canonical_strategy()) {
        let rel = PathRelationship::between(&p1, &p2);
        let flags = [
            rel == PathRelationship::Same,
            rel == PathRelationship::Ancestor,
            rel == PathRelationship::Descendant,
            rel == PathRelationship::Unrelated,
        ];
        prop_assert_eq!(flags.iter().filter(|&&x| x).count(), 1);
        prop_assert_eq!(PathRelationship::is_within(&p1, &p2), rel == PathRelationship::Same || rel == PathRelationship::Descendant);
    }
}
