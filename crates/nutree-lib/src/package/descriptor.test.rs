use super::*;

fn descriptor(id: &str, version: &str, platform: &str) -> PackageDescriptor {
    PackageDescriptor::new(
        PackageIdentity::new(id, version.parse().unwrap()),
        platform.parse().unwrap(),
    )
}

fn edge(id: &str, range: &str) -> DependencyEdge {
    DependencyEdge::new(id, range.parse().unwrap())
}

#[test]
fn test_edge_display_and_targets() {
    let dep = edge("MimeKit", "2.15.0");
    assert_eq!(dep.to_string(), "MimeKit [2.15.0, )");
    assert!(dep.targets("mimekit"));
    assert!(!dep.targets("MailKit"));
}

#[test]
fn test_descriptor_display() {
    let pkg = descriptor("MailKit", "2.15.0", "net5.0");
    assert_eq!(pkg.to_string(), "MailKit.2.15.0 {net5.0}");
}

#[test]
fn test_equality_uses_identity_and_platform() {
    let a = descriptor("MailKit", "2.15.0", "net5.0").with_source_feed("feed-a");
    let b = descriptor("mailkit", "2.15.0", "net5.0").with_source_feed("feed-b");
    let c = descriptor("MailKit", "2.15.0", "netstandard2.0");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(c > a);
}

#[test]
fn test_summary_lists_dependencies() {
    let root = descriptor("MailKit", "2.15.0", "net5.0");
    assert_eq!(root.summary(), "MailKit.2.15.0");

    let with_deps = root.with_dependencies(vec![
        edge("Portable.BouncyCastle", "1.8.10"),
        edge("System.Buffers", "4.5.1"),
    ]);
    assert_eq!(
        with_deps.summary(),
        "MailKit.2.15.0 : Portable.BouncyCastle [1.8.10, ), System.Buffers [4.5.1, )"
    );
}

#[test]
fn test_select_nearest_group() {
    let groups = vec![
        DependencyGroup::new("net461".parse().unwrap(), vec![edge("Legacy", "1.0")]),
        DependencyGroup::new(
            "netstandard2.0".parse().unwrap(),
            vec![edge("System.Buffers", "4.5.1")],
        ),
        DependencyGroup::new("net5.0".parse().unwrap(), vec![]),
    ];

    let net5 = DependencyGroup::select_nearest(&groups, &"net5.0".parse().unwrap());
    assert!(net5.is_empty());

    let core = DependencyGroup::select_nearest(&groups, &"netcoreapp3.1".parse().unwrap());
    assert_eq!(core, vec![edge("System.Buffers", "4.5.1")]);

    let legacy = DependencyGroup::select_nearest(&groups, &"net40".parse().unwrap());
    assert!(legacy.is_empty());
}

#[test]
fn test_root_source_accessors() {
    let pkg = Arc::new(descriptor("Local.Package", "1.0.0", "net5.0"));
    let local = RootSource::LocalArtifact(Arc::clone(&pkg));
    let feed = RootSource::Feed(pkg);
    assert!(local.is_local());
    assert!(!feed.is_local());
    assert_eq!(local.identity(), feed.identity());
}
