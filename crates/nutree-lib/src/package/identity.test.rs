use super::*;
use std::collections::HashSet;

fn identity(id: &str, version: &str) -> PackageIdentity {
    PackageIdentity::new(id, version.parse().unwrap())
}

#[test]
fn test_display_keeps_original_casing() {
    assert_eq!(identity("MailKit", "2.15.0").to_string(), "MailKit.2.15.0");
    assert_eq!(identity("Foo", "1.0").to_string(), "Foo.1.0.0");
}

#[test]
fn test_equality_ignores_id_case() {
    assert_eq!(identity("MimeKit", "2.15.0"), identity("mimekit", "2.15.0"));
    assert_ne!(identity("MimeKit", "2.15.0"), identity("MimeKit", "2.15.1"));
}

#[test]
fn test_hash_matches_equality() {
    let mut set = HashSet::new();
    set.insert(identity("System.Buffers", "4.5.1"));
    assert!(set.contains(&identity("SYSTEM.BUFFERS", "4.5.1")));
    assert!(!set.insert(identity("system.buffers", "4.5.1.0")));
}

#[test]
fn test_ordering_by_id_then_version() {
    let mut ids = vec![
        identity("b", "1.0.0"),
        identity("A", "2.0.0"),
        identity("a", "1.0.0"),
    ];
    ids.sort();
    let rendered: Vec<_> = ids.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["a.1.0.0", "A.2.0.0", "b.1.0.0"]);
}

#[test]
fn test_has_id_and_normalization() {
    let pkg = identity("Portable.BouncyCastle", "1.8.10");
    assert!(pkg.has_id("portable.bouncycastle"));
    assert_eq!(pkg.normalized_id(), "portable.bouncycastle");
    assert_eq!(normalize_id("MimeKit"), "mimekit");
}
