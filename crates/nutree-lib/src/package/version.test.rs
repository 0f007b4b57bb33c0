use super::*;

fn v(text: &str) -> PackageVersion {
    text.parse().unwrap()
}

fn r(text: &str) -> VersionRange {
    text.parse().unwrap()
}

#[test]
fn test_parse_pads_missing_parts() {
    let version = v("4.7");
    assert_eq!(version.major(), 4);
    assert_eq!(version.minor(), 7);
    assert_eq!(version.patch(), 0);
    assert_eq!(version.to_string(), "4.7.0");
}

#[test]
fn test_parse_four_part_version() {
    let version = v("1.8.10.3");
    assert_eq!(version.revision(), 3);
    assert_eq!(version.to_string(), "1.8.10.3");
    assert_eq!(v("1.8.10.0").to_string(), "1.8.10");
}

#[test]
fn test_parse_prerelease_and_build_metadata() {
    let version = v("2.0.0-beta.1+sha.abc");
    assert!(version.is_prerelease());
    assert_eq!(version.prerelease(), "beta.1");
    assert_eq!(version.to_string(), "2.0.0-beta.1");
    assert_eq!(version, v("2.0.0-beta.1"));
}

#[test]
fn test_parse_rejects_garbage() {
    assert!("".parse::<PackageVersion>().is_err());
    assert!("abc".parse::<PackageVersion>().is_err());
    assert!("1.2.3.4.5".parse::<PackageVersion>().is_err());
    assert!("1..2".parse::<PackageVersion>().is_err());
}

#[test]
fn test_ordering() {
    assert!(v("1.0.0") < v("1.0.1"));
    assert!(v("1.0.0") < v("1.0.0.1"));
    assert!(v("1.0.0-alpha") < v("1.0.0"));
    assert!(v("1.0.0-alpha") < v("1.0.0-beta"));
    assert!(v("4.4.0") < v("4.5.1"));
    assert_eq!(v("2.0"), v("2.0.0.0"));
}

#[test]
fn test_prerelease_labels_ignore_case() {
    use std::collections::HashSet;

    assert_eq!(v("1.0.0-Beta"), v("1.0.0-beta"));
    assert!(v("1.0.0-ALPHA") < v("1.0.0-beta"));
    assert_eq!(v("1.0.0-Beta").to_string(), "1.0.0-Beta");

    let set: HashSet<PackageVersion> = [v("2.0.0-RC.1"), v("2.0.0-rc.1")].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn test_next_prerelease_is_immediate_successor() {
    let beta = v("1.0.0-Beta");
    let next = beta.next_prerelease().unwrap();

    assert_eq!(next.to_string(), "1.0.0-Beta.0");
    assert!(beta < next);
    assert!(next < v("1.0.0-beta.1"));
    assert!(next < v("1.0.0-beta-2"));
    assert!(next < v("1.0.0"));
    assert!(v("1.0.0").next_prerelease().is_none());
}

#[test]
fn test_range_bare_version_is_minimum_inclusive() {
    let range = r("2.15.0");
    assert_eq!(range.min_version(), Some(&v("2.15.0")));
    assert!(range.is_min_inclusive());
    assert!(range.max_version().is_none());
    assert_eq!(range.to_string(), "[2.15.0, )");
}

#[test]
fn test_range_display_forms() {
    assert_eq!(r("[1.0]").to_string(), "[1.0.0]");
    assert_eq!(r("(1.0, 2.0]").to_string(), "(1.0.0, 2.0.0]");
    assert_eq!(r("(, 2.0)").to_string(), "(, 2.0.0)");
    assert_eq!(r("*").to_string(), "(, )");
    assert_eq!(r("").to_string(), "(, )");
    assert_eq!(r("[4.7.0, )").to_string(), "[4.7.0, )");
}

#[test]
fn test_range_satisfies() {
    let range = r("[1.0, 2.0)");
    assert!(range.satisfies(&v("1.0.0")));
    assert!(range.satisfies(&v("1.9.9")));
    assert!(!range.satisfies(&v("2.0.0")));
    assert!(!range.satisfies(&v("0.9.0")));

    let exclusive = r("(1.0, )");
    assert!(!exclusive.satisfies(&v("1.0.0")));
    assert!(exclusive.satisfies(&v("1.0.1")));

    let exact = r("[1.5]");
    assert!(exact.satisfies(&v("1.5.0")));
    assert!(!exact.satisfies(&v("1.5.1")));

    assert!(VersionRange::all().satisfies(&v("0.0.1")));
}

#[test]
fn test_range_rejects_empty_intervals() {
    assert!("[2.0, 1.0]".parse::<VersionRange>().is_err());
    assert!("(1.0, 1.0)".parse::<VersionRange>().is_err());
    assert!("(1.0)".parse::<VersionRange>().is_err());
    assert!("[1.0, 2.0".parse::<VersionRange>().is_err());
}

#[test]
fn test_range_constructors() {
    let exact = VersionRange::exact(v("3.1.0"));
    assert_eq!(exact.min_version(), exact.max_version());
    assert_eq!(exact.to_string(), "[3.1.0]");

    let minimum = VersionRange::at_least(v("3.1.0"));
    assert_eq!(minimum, r("3.1.0"));
}
