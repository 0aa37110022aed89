//! Key sanitization tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use proptest::prelude::*;

use proftool_core::key::sanitize;
use proftool_core::MetricKey;

#[test]
fn strips_signature_noise() {
    assert_eq!(sanitize("Foo#bar(int, java/lang/String)"), "Foo.bar_int__javalangString");
    assert_eq!(sanitize("List<String>"), "ListString");
    assert_eq!(sanitize("Map<?, ?>"), "Map__");
    assert_eq!(sanitize(r"dir\file"), "dirfile");
    assert_eq!(sanitize("com.example.Worker"), "com.example.Worker");
}

#[test]
fn operation_key_joins_with_dot() {
    let k = MetricKey::operation("com.example.Worker", "run()");
    assert_eq!(k.as_str(), "com.example.Worker.run_");
    assert_eq!(MetricKey::entity("a b").as_str(), "a_b");
}

#[test]
fn from_sanitized_accepts_only_clean_keys() {
    let k = MetricKey::operation("Foo", "bar(int)");
    assert_eq!(MetricKey::from_sanitized(k.as_str()), Some(k));
    assert_eq!(MetricKey::from_sanitized("Foo#bar"), None);
    assert_eq!(MetricKey::from_sanitized("Foo.bar(int)"), None);
    assert_eq!(MetricKey::from_sanitized("List<String>"), None);
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(raw in ".*") {
        let once = sanitize(&raw);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn sanitized_output_has_no_reserved_chars(raw in ".*") {
        let out = sanitize(&raw);
        for c in [' ', '(', ')', '<', '>', '?', ',', '/', '\\', '#'] {
            prop_assert!(!out.contains(c), "{:?} contains {:?}", out, c);
        }
    }
}
