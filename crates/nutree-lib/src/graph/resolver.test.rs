use super::*;
use crate::package::{DependencyEdge, PackageIdentity, PackageVersion};
use crate::testing::{MAILKIT_INSTALL_ORDER, at_least, identity, mailkit_feed, net5};

fn package(id: &str, version: (u64, u64, u64), dependencies: Vec<DependencyEdge>) -> Arc<PackageDescriptor> {
    Arc::new(
        PackageDescriptor::new(identity(id, version.0, version.1, version.2), net5())
            .with_dependencies(dependencies),
    )
}

fn range(id: &str, notation: &str) -> DependencyEdge {
    DependencyEdge::new(id, notation.parse().unwrap())
}

fn feed_candidates(root: &Arc<PackageDescriptor>, others: Vec<Arc<PackageDescriptor>>) -> CandidateSet {
    let mut packages = others;
    packages.push(Arc::clone(root));
    CandidateSet::new(RootSource::Feed(Arc::clone(root)), packages)
}

fn chosen(resolved: &ResolvedSet) -> Vec<String> {
    resolved.iter().map(|d| d.identity().to_string()).collect()
}

const NO_KEEP: &[&str] = &[];

#[test]
fn test_lowest_satisfying_version_wins() {
    let root = package("App", (1, 0, 0), vec![at_least("Lib", 1, 0, 0)]);
    let candidates = feed_candidates(
        &root,
        vec![
            package("Lib", (1, 2, 0), vec![]),
            package("Lib", (1, 0, 0), vec![]),
            package("Lib", (2, 0, 0), vec![]),
        ],
    );

    let resolved = Resolver::new().resolve(NO_KEEP, &candidates).unwrap();

    assert_eq!(chosen(&resolved), vec!["App.1.0.0", "Lib.1.0.0"]);
}

#[test]
fn test_highest_lower_bound_across_edges() {
    let root = package(
        "App",
        (1, 0, 0),
        vec![at_least("Left", 1, 0, 0), at_least("Right", 1, 0, 0)],
    );
    let candidates = feed_candidates(
        &root,
        vec![
            package("Left", (1, 0, 0), vec![at_least("Shared", 1, 0, 0)]),
            package("Right", (1, 0, 0), vec![at_least("Shared", 1, 5, 0)]),
            package("Shared", (1, 0, 0), vec![]),
            package("Shared", (1, 5, 0), vec![]),
            package("Shared", (2, 0, 0), vec![]),
        ],
    );

    let resolved = Resolver::new().resolve(NO_KEEP, &candidates).unwrap();

    assert_eq!(
        resolved.get("shared").unwrap().identity().version(),
        &PackageVersion::new(1, 5, 0)
    );
    assert_eq!(resolved.len(), 4);
}

#[test]
fn test_backtracks_out_of_a_conflicting_choice() {
    // Lib 1.0.0 needs Core < 2.0 but App needs Core >= 2.0; Lib 1.1.0 works
    let root = package(
        "App",
        (1, 0, 0),
        vec![at_least("Lib", 1, 0, 0), at_least("Core", 2, 0, 0)],
    );
    let candidates = feed_candidates(
        &root,
        vec![
            package("Core", (1, 0, 0), vec![]),
            package("Core", (2, 0, 0), vec![]),
            package("Lib", (1, 0, 0), vec![range("Core", "[1.0.0, 2.0.0)")]),
            package("Lib", (1, 1, 0), vec![range("Core", "[2.0.0, 3.0.0)")]),
        ],
    );

    let resolved = Resolver::new().resolve(NO_KEEP, &candidates).unwrap();

    assert_eq!(chosen(&resolved), vec!["App.1.0.0", "Core.2.0.0", "Lib.1.1.0"]);
}

#[test]
fn test_unreferenced_candidates_are_pruned() {
    // Lib 1.0.0 is chosen, so Extra (only needed by Lib 2.0.0) is dropped
    let root = package("App", (1, 0, 0), vec![at_least("Lib", 1, 0, 0)]);
    let candidates = feed_candidates(
        &root,
        vec![
            package("Lib", (1, 0, 0), vec![]),
            package("Lib", (2, 0, 0), vec![at_least("Extra", 1, 0, 0)]),
            package("Extra", (1, 0, 0), vec![]),
        ],
    );

    let resolved = Resolver::new().resolve(NO_KEEP, &candidates).unwrap();

    assert!(!resolved.contains("Extra"));
    assert_eq!(resolved.len(), 2);
}

#[test]
fn test_unsatisfiable_constraint_lists_every_range() {
    let root = package(
        "App",
        (1, 0, 0),
        vec![range("Core", "[1.0.0, 2.0.0)"), at_least("Lib", 1, 0, 0)],
    );
    let candidates = feed_candidates(
        &root,
        vec![
            package("Core", (1, 0, 0), vec![]),
            package("Core", (2, 0, 0), vec![]),
            package("Lib", (1, 0, 0), vec![at_least("Core", 2, 0, 0)]),
        ],
    );

    let error = Resolver::new().resolve(NO_KEEP, &candidates).unwrap_err();

    match error {
        ResolutionError::UnsatisfiableConstraint { id, constraints } => {
            assert_eq!(id, "Core");
            let described: Vec<String> = constraints
                .iter()
                .map(|(by, range)| format!("{} {}", by, range))
                .collect();
            assert!(described.contains(&"App.1.0.0 [1.0.0, 2.0.0)".to_string()));
            assert!(described.contains(&"Lib.1.0.0 [2.0.0, )".to_string()));
        }
        other => panic!("expected unsatisfiable constraint, got {:?}", other),
    }
}

#[test]
fn test_backtracking_drops_requirements_of_rejected_versions() {
    let root = package(
        "App",
        (1, 0, 0),
        vec![at_least("A", 1, 0, 0), at_least("B", 1, 0, 0)],
    );
    let candidates = feed_candidates(
        &root,
        vec![
            package("A", (1, 0, 0), vec![at_least("Ghost", 1, 0, 0)]),
            package("A", (1, 1, 0), vec![]),
            package("B", (1, 0, 0), vec![]),
        ],
    );

    let resolved = Resolver::new().resolve(NO_KEEP, &candidates).unwrap();

    assert_eq!(resolved.get("A").unwrap().identity().to_string(), "A.1.1.0");
    assert_eq!(resolved.get("B").unwrap().identity().to_string(), "B.1.0.0");
    assert!(!resolved.contains("Ghost"));
    assert_eq!(resolved.len(), 3);
}

#[test]
fn test_required_id_without_candidates() {
    let root = package("App", (1, 0, 0), vec![at_least("Ghost", 1, 0, 0)]);
    let candidates = feed_candidates(&root, vec![]);

    let error = Resolver::new().resolve(NO_KEEP, &candidates).unwrap_err();

    assert!(matches!(
        error,
        ResolutionError::UnsatisfiableConstraint { ref id, ref constraints }
            if id == "Ghost" && constraints.len() == 1
    ));
}

#[test]
fn test_missing_feed_root() {
    let root = package("App", (1, 0, 0), vec![]);
    let candidates = CandidateSet::new(RootSource::Feed(Arc::clone(&root)), vec![]);

    let error = Resolver::new().resolve(NO_KEEP, &candidates).unwrap_err();

    assert!(matches!(error, ResolutionError::MissingRoot { .. }));
}

#[test]
fn test_local_root_descriptor_is_returned_as_given() {
    let root = package("Local", (1, 0, 0), vec![at_least("Lib", 1, 0, 0)]);
    let candidates = CandidateSet::new(
        RootSource::LocalArtifact(Arc::clone(&root)),
        vec![
            package("Lib", (1, 0, 0), vec![]),
            // Another version of the root id published on a feed never replaces it
            package("Local", (2, 0, 0), vec![]),
        ],
    );

    let resolved = Resolver::new().resolve(NO_KEEP, &candidates).unwrap();

    assert!(Arc::ptr_eq(resolved.root(), &root));
    assert_eq!(chosen(&resolved), vec!["Lib.1.0.0", "Local.1.0.0"]);
}

#[test]
fn test_edges_back_to_a_local_root_are_checked() {
    let root = package("Local", (1, 0, 0), vec![at_least("Plugin", 1, 0, 0)]);
    let candidates = CandidateSet::new(
        RootSource::LocalArtifact(Arc::clone(&root)),
        vec![package("Plugin", (1, 0, 0), vec![at_least("Local", 2, 0, 0)])],
    );

    let error = Resolver::new().resolve(NO_KEEP, &candidates).unwrap_err();

    assert!(matches!(
        error,
        ResolutionError::UnsatisfiableConstraint { ref id, .. } if id == "Local"
    ));
}

#[test]
fn test_keep_ids_are_retained() {
    let root = package("App", (1, 0, 0), vec![]);
    let candidates = feed_candidates(&root, vec![package("Tool", (1, 0, 0), vec![])]);

    let pruned = Resolver::new().resolve(NO_KEEP, &candidates).unwrap();
    let kept = Resolver::new().resolve(&["tool"], &candidates).unwrap();

    assert_eq!(chosen(&pruned), vec!["App.1.0.0"]);
    assert_eq!(chosen(&kept), vec!["App.1.0.0", "Tool.1.0.0"]);
}

#[test]
fn test_cycle_among_chosen_packages() {
    let root = package("App", (1, 0, 0), vec![at_least("A", 1, 0, 0)]);
    let candidates = feed_candidates(
        &root,
        vec![
            package("A", (1, 0, 0), vec![at_least("B", 1, 0, 0)]),
            package("B", (1, 0, 0), vec![at_least("A", 1, 0, 0)]),
        ],
    );

    let error = Resolver::new().resolve(NO_KEEP, &candidates).unwrap_err();

    match error {
        ResolutionError::CyclicDependency { cycle } => assert_eq!(cycle, vec!["A", "B"]),
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[test]
fn test_error_messages() {
    let error = ResolutionError::UnsatisfiableConstraint {
        id: "Core".to_string(),
        constraints: vec![(
            "App.1.0.0".to_string(),
            "[1.0.0, 2.0.0)".parse().unwrap(),
        )],
    };
    assert_eq!(
        error.to_string(),
        "No version of Core satisfies [1.0.0, 2.0.0) (required by App.1.0.0)"
    );

    let cycle = ResolutionError::CyclicDependency {
        cycle: vec!["A".to_string(), "B".to_string()],
    };
    assert_eq!(cycle.to_string(), "Circular dependency detected: A → B");
}

#[tokio::test]
async fn test_mailkit_resolution() {
    use crate::feed::FeedSession;
    use crate::graph::discovery::{GraphDiscoverer, RootRequest};
    use tokio_util::sync::CancellationToken;

    let session = FeedSession::new(vec![mailkit_feed("nuget")]);
    let candidates = GraphDiscoverer::default()
        .discover(
            &session,
            &RootRequest::Identity(PackageIdentity::new("MailKit", PackageVersion::new(2, 15, 0))),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let resolved = Resolver::new().resolve(&["MailKit"], &candidates).unwrap();
    let order: Vec<String> = resolved
        .install_order()
        .unwrap()
        .iter()
        .map(|d| d.summary())
        .collect();

    assert_eq!(resolved.len(), 9);
    assert_eq!(order, MAILKIT_INSTALL_ORDER);
}
