use super::*;
use crate::application::cli::PackageArgs;
use crate::feed::InMemoryFeed;
use crate::graph::WalkerConfig;
use crate::testing::{MAILKIT_INSTALL_ORDER, MAILKIT_TREE, PackageDirFixture, mailkit_feed};

fn walker() -> DependencyWalker<InMemoryFeed> {
    DependencyWalker::new(
        FeedSession::new(vec![mailkit_feed("https://api.nuget.org/v3/index.json")]),
        WalkerConfig::default(),
    )
}

fn mailkit_args() -> PackageArgs {
    PackageArgs {
        id: Some("MailKit".to_string()),
        package_version: Some("2.15.0".to_string()),
        nupkg: None,
        framework: "net5.0".to_string(),
    }
}

#[tokio::test]
async fn test_retrieve_report() {
    let report = run_command(
        &Commands::Retrieve(mailkit_args()),
        &walker(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        report,
        "\nSuccessfully retrieved package: MailKit.2.15.0 {net5.0} from https://api.nuget.org/v3/index.json\n"
    );
}

#[tokio::test]
async fn test_retrieve_unknown_package_fails() {
    let args = PackageArgs {
        id: Some("Nope".to_string()),
        ..mailkit_args()
    };

    let error = run_command(&Commands::Retrieve(args), &walker(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "Unable to retrieve package: Nope.2.15.0 {net5.0}"
    );
}

#[tokio::test]
async fn test_tree_rejects_a_missing_root_version() {
    let feed = InMemoryFeed::new("feed").with_package(
        crate::testing::identity("Root", 1, 1, 0),
        vec![crate::testing::at_least("Dep", 1, 0, 0)],
    );
    let walker = DependencyWalker::new(FeedSession::new(vec![feed]), WalkerConfig::default());
    let args = PackageArgs {
        id: Some("Root".to_string()),
        package_version: Some("1.0.0".to_string()),
        ..mailkit_args()
    };

    let error = run_command(&Commands::Tree(args), &walker, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "Unable to retrieve package: Root.1.0.0 {net5.0}"
    );
}

#[tokio::test]
async fn test_transitive_report_lists_dependencies_first() {
    let report = run_command(
        &Commands::Transitive(mailkit_args()),
        &walker(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let expected = format!(
        "\nTransitive Dependencies\n============\n{}\n",
        MAILKIT_INSTALL_ORDER.join("\n")
    );
    assert!(report.ends_with(&expected), "unexpected report:\n{}", report);
    assert!(!report.contains("Dependency Tree"));
}

#[tokio::test]
async fn test_tree_report_includes_listing_and_tree() {
    let report = run_command(
        &Commands::Tree(mailkit_args()),
        &walker(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(report.contains("Transitive Dependencies"));
    assert!(report.ends_with(&format!("\nDependency Tree\n============\n{}", MAILKIT_TREE)));
}

#[tokio::test]
async fn test_tree_from_local_nupkg() {
    let fixture = PackageDirFixture::new().unwrap();
    let nupkg = fixture
        .write_nupkg(
            "",
            "MyApp",
            "1.0.0",
            &[("net5.0", &[("MimeKit", "2.15.0")])],
        )
        .unwrap();
    let args = PackageArgs {
        id: None,
        package_version: None,
        nupkg: Some(nupkg.clone()),
        framework: "net5.0".to_string(),
    };

    let report = run_command(&Commands::Tree(args), &walker(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(report.starts_with(&format!(
        "\nSuccessfully read package: MyApp.1.0.0 {{net5.0}} from {}\n",
        nupkg.display()
    )));
    assert!(report.contains("\nMyApp.1.0.0  {net5.0}\n    MimeKit.2.15.0  [2.15.0, )\n"));
    assert!(report.contains("MyApp.1.0.0 : MimeKit [2.15.0, )\n"));
}

#[tokio::test]
async fn test_invalid_selection_is_rejected_before_any_lookup() {
    let walker = walker();
    let args = PackageArgs {
        nupkg: Some("x.nupkg".into()),
        ..mailkit_args()
    };

    let result = run_command(&Commands::Tree(args), &walker, &CancellationToken::new()).await;

    assert!(result.is_err());
    assert_eq!(walker.session().feeds()[0].call_count(), 0);
}

#[test]
fn test_build_walker_uses_every_configured_feed() {
    let config = AppConfig {
        feeds: vec![
            "https://example.test/v3/index.json".to_string(),
            "./packages".to_string(),
        ],
        ..AppConfig::default()
    };

    let walker = build_walker(&config).unwrap();
    let names: Vec<&str> = walker.session().feeds().iter().map(|f| f.name()).collect();

    assert_eq!(names.len(), 2);
    assert!(matches!(walker.session().feeds()[0], ConfiguredFeed::Http(_)));
    assert!(matches!(walker.session().feeds()[1], ConfiguredFeed::Local(_)));
}
