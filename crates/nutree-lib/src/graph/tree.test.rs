use super::*;
use crate::testing::{MAILKIT_TREE, at_least, identity, mailkit_feed, net5};

fn package(id: &str, version: (u64, u64, u64), dependencies: Vec<DependencyEdge>) -> Arc<PackageDescriptor> {
    Arc::new(
        PackageDescriptor::new(identity(id, version.0, version.1, version.2), net5())
            .with_dependencies(dependencies),
    )
}

fn resolved(root: &Arc<PackageDescriptor>, others: Vec<Arc<PackageDescriptor>>) -> ResolvedSet {
    ResolvedSet::new(Arc::clone(root), others).unwrap()
}

#[test]
fn test_zero_dependency_root_renders_one_line() {
    let root = package("Solo", (1, 0, 0), vec![]);
    let tree = TreeBuilder::new().build(&root, &resolved(&root, vec![])).unwrap();

    assert_eq!(tree.len(), 1);
    assert!(tree.root().is_root());
    assert_eq!(tree.render(), "Solo.1.0.0  {net5.0}\n");
}

#[test]
fn test_rendered_range_is_the_declared_one() {
    let root = package("App", (1, 0, 0), vec![at_least("Lib", 1, 0, 0)]);
    let lib = package("Lib", (1, 4, 0), vec![]);
    let tree = TreeBuilder::new()
        .build(&root, &resolved(&root, vec![lib]))
        .unwrap();

    assert_eq!(tree.render(), "App.1.0.0  {net5.0}\n    Lib.1.4.0  [1.0.0, )\n");
}

#[test]
fn test_shared_dependency_appears_under_each_parent() {
    let root = package(
        "App",
        (1, 0, 0),
        vec![at_least("Left", 1, 0, 0), at_least("Right", 1, 0, 0)],
    );
    let left = package("Left", (1, 0, 0), vec![at_least("Shared", 1, 0, 0)]);
    let right = package("Right", (1, 0, 0), vec![at_least("shared", 1, 0, 0)]);
    let shared = package("Shared", (1, 0, 0), vec![]);
    let tree = TreeBuilder::new()
        .build(&root, &resolved(&root, vec![left, right, shared]))
        .unwrap();

    let shared_nodes: Vec<&TreeNode> = tree
        .pre_order()
        .map(|(_, node)| node)
        .filter(|node| node.descriptor().id() == "Shared")
        .collect();

    assert_eq!(tree.len(), 5);
    assert_eq!(shared_nodes.len(), 2);
    assert!(Arc::ptr_eq(
        shared_nodes[0].descriptor(),
        shared_nodes[1].descriptor()
    ));
    assert_eq!(shared_nodes[1].incoming_edge().unwrap().target_id(), "shared");
}

#[test]
fn test_node_links() {
    let root = package("App", (1, 0, 0), vec![at_least("Lib", 1, 0, 0)]);
    let lib = package("Lib", (1, 0, 0), vec![at_least("Core", 1, 0, 0)]);
    let core = package("Core", (1, 0, 0), vec![]);
    let tree = TreeBuilder::new()
        .build(&root, &resolved(&root, vec![lib, core]))
        .unwrap();

    let root_node = tree.root();
    assert!(root_node.incoming_edge().is_none());
    assert_eq!(root_node.children().len(), 1);

    let lib_id = root_node.children()[0];
    let lib_node = tree.get(lib_id).unwrap();
    assert_eq!(lib_node.parent(), Some(tree.root_id()));
    assert_eq!(lib_node.depth(), 1);

    let core_id = lib_node.children()[0];
    assert_eq!(tree.get(core_id).unwrap().depth(), 2);
    assert_eq!(tree.path_to(core_id), vec!["App", "Lib", "Core"]);
    assert_eq!(tree.depth(), 2);
}

#[test]
fn test_missing_resolved_entry_is_classified() {
    let root = package("App", (1, 0, 0), vec![at_least("Lib", 1, 0, 0)]);
    let error = TreeBuilder::new()
        .build(&root, &resolved(&root, vec![]))
        .unwrap_err();

    match error {
        TreeError::MissingResolvedEntry { parent, edge } => {
            assert_eq!(parent, "App.1.0.0");
            assert_eq!(edge.target_id(), "Lib");
        }
        other => panic!("expected missing entry, got {:?}", other),
    }
}

#[test]
fn test_cycle_is_reported_with_its_path() {
    let root = package("App", (1, 0, 0), vec![at_least("A", 1, 0, 0)]);
    let a = package("A", (1, 0, 0), vec![at_least("B", 1, 0, 0)]);
    let b = package("B", (1, 0, 0), vec![at_least("A", 1, 0, 0)]);
    let error = TreeBuilder::new()
        .build(&root, &resolved(&root, vec![a, b]))
        .unwrap_err();

    match error {
        TreeError::CyclicDependency { path } => assert_eq!(path, vec!["App", "A", "B", "A"]),
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[test]
fn test_self_dependency_is_a_cycle() {
    let root = package("App", (1, 0, 0), vec![at_least("app", 1, 0, 0)]);
    let error = TreeBuilder::new()
        .build(&root, &resolved(&root, vec![]))
        .unwrap_err();

    assert!(matches!(error, TreeError::CyclicDependency { .. }));
}

#[test]
fn test_pre_order_visits_children_in_declaration_order() {
    let root = package(
        "App",
        (1, 0, 0),
        vec![at_least("Zed", 1, 0, 0), at_least("Alpha", 1, 0, 0)],
    );
    let zed = package("Zed", (1, 0, 0), vec![at_least("Mid", 1, 0, 0)]);
    let alpha = package("Alpha", (1, 0, 0), vec![]);
    let mid = package("Mid", (1, 0, 0), vec![]);
    let tree = TreeBuilder::new()
        .build(&root, &resolved(&root, vec![zed, alpha, mid]))
        .unwrap();

    let visited: Vec<&str> = tree
        .pre_order()
        .map(|(_, node)| node.descriptor().id())
        .collect();

    assert_eq!(visited, vec!["App", "Zed", "Mid", "Alpha"]);
}

#[tokio::test]
async fn test_mailkit_tree_renders_exactly() {
    use crate::feed::FeedSession;
    use crate::graph::discovery::{GraphDiscoverer, RootRequest};
    use crate::graph::resolver::Resolver;
    use tokio_util::sync::CancellationToken;

    let session = FeedSession::new(vec![mailkit_feed("nuget")]);
    let candidates = GraphDiscoverer::default()
        .discover(
            &session,
            &RootRequest::Identity(identity("MailKit", 2, 15, 0)),
            &net5(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    let resolved = Resolver::new().resolve(&["MailKit"], &candidates).unwrap();

    let tree = TreeBuilder::new()
        .build(candidates.root().descriptor(), &resolved)
        .unwrap();

    assert_eq!(tree.len(), 9);
    assert_eq!(tree.render(), MAILKIT_TREE);
}
