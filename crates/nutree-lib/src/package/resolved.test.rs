use super::*;
use crate::package::{DependencyEdge, PackageIdentity};

fn descriptor(id: &str, version: &str, deps: &[(&str, &str)]) -> Arc<PackageDescriptor> {
    let edges = deps
        .iter()
        .map(|(dep, range)| DependencyEdge::new(*dep, range.parse().unwrap()))
        .collect();
    Arc::new(
        PackageDescriptor::new(
            PackageIdentity::new(id, version.parse().unwrap()),
            "net5.0".parse().unwrap(),
        )
        .with_dependencies(edges),
    )
}

#[test]
fn test_lookup_is_case_insensitive() {
    let set = ResolvedSet::new(
        descriptor("Root", "1.0.0", &[("Dep", "1.0")]),
        vec![descriptor("Dep", "1.0.0", &[])],
    )
    .unwrap();

    assert_eq!(set.len(), 2);
    assert!(set.contains("dep"));
    assert!(set.contains("ROOT"));
    assert_eq!(set.get("DEP").unwrap().id(), "Dep");
    assert_eq!(set.root().id(), "Root");
}

#[test]
fn test_rejects_duplicate_ids() {
    let result = ResolvedSet::new(
        descriptor("Root", "1.0.0", &[]),
        vec![
            descriptor("Dep", "1.0.0", &[]),
            descriptor("dep", "2.0.0", &[]),
        ],
    );
    assert!(matches!(
        result,
        Err(PackageError::DuplicateResolvedEntry { .. })
    ));
}

#[test]
fn test_iter_is_sorted_by_id() {
    let set = ResolvedSet::new(
        descriptor("Root", "1.0.0", &[]),
        vec![descriptor("b", "1.0.0", &[]), descriptor("A", "1.0.0", &[])],
    )
    .unwrap();
    let ids: Vec<_> = set.iter().map(|d| d.id().to_string()).collect();
    assert_eq!(ids, vec!["A", "b", "Root"]);
}

#[test]
fn test_install_order_puts_dependencies_first() {
    let set = ResolvedSet::new(
        descriptor("App", "1.0.0", &[("Zeta", "1.0"), ("Alpha", "1.0")]),
        vec![
            descriptor("Zeta", "1.0.0", &[("Core", "1.0")]),
            descriptor("Alpha", "1.0.0", &[]),
            descriptor("Core", "1.0.0", &[]),
        ],
    )
    .unwrap();

    let order: Vec<_> = set
        .install_order()
        .unwrap()
        .iter()
        .map(|d| d.id().to_string())
        .collect();
    assert_eq!(order, vec!["Alpha", "Core", "Zeta", "App"]);
}

#[test]
fn test_install_order_reports_cycles() {
    let set = ResolvedSet::new(
        descriptor("Root", "1.0.0", &[("A", "1.0")]),
        vec![
            descriptor("A", "1.0.0", &[("B", "1.0")]),
            descriptor("B", "1.0.0", &[("A", "1.0")]),
        ],
    )
    .unwrap();

    assert_eq!(
        set.find_cycle(),
        Some(vec!["A".to_string(), "B".to_string()])
    );
    match set.install_order() {
        Err(PackageError::CyclicDependency { cycle }) => assert_eq!(cycle, "A → B"),
        other => panic!("expected cycle error, got {:?}", other),
    }
}

#[test]
fn test_edges_to_unknown_ids_are_ignored() {
    let set = ResolvedSet::new(descriptor("Root", "1.0.0", &[("Elsewhere", "1.0")]), vec![])
        .unwrap();
    assert!(set.find_cycle().is_none());
    assert_eq!(set.install_order().unwrap().len(), 1);
}
