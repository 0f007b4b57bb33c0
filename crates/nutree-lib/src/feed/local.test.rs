use super::*;
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

fn nuspec(id: &str, version: &str, deps: &[(&str, &str)]) -> String {
    let deps: String = deps
        .iter()
        .map(|(dep, range)| format!(r#"<dependency id="{}" version="{}" />"#, dep, range))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package>
  <metadata>
    <id>{}</id>
    <version>{}</version>
    <dependencies>
      <group targetFramework="netstandard2.0">{}</group>
    </dependencies>
  </metadata>
</package>"#,
        id, version, deps
    )
}

fn write_nupkg(dir: &Path, id: &str, version: &str, deps: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(format!("{}.{}.nupkg", id.to_lowercase(), version));
    let mut archive = zip::ZipWriter::new(File::create(&path).unwrap());
    archive
        .start_file(
            format!("{}.nuspec", id),
            zip::write::SimpleFileOptions::default(),
        )
        .unwrap();
    archive
        .write_all(nuspec(id, version, deps).as_bytes())
        .unwrap();
    archive.finish().unwrap();
    path
}

fn identity(id: &str, version: &str) -> PackageIdentity {
    PackageIdentity::new(id, version.parse().unwrap())
}

fn net5() -> Framework {
    "net5.0".parse().unwrap()
}

#[tokio::test]
async fn test_resolves_packages_from_folder_tree() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("mimekit");
    std::fs::create_dir_all(&nested).unwrap();

    write_nupkg(dir.path(), "MailKit", "2.15.0", &[("MimeKit", "2.15.0")]);
    let mimekit = write_nupkg(&nested, "MimeKit", "2.15.0", &[]);
    std::fs::write(
        nested.join("MimeKit.3.0.0.nuspec"),
        nuspec("MimeKit", "3.0.0", &[]),
    )
    .unwrap();

    let feed = LocalFolderFeed::new(dir.path());

    let mailkit = feed
        .resolve(&identity("mailkit", "2.15.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mailkit.to_string(), "MailKit.2.15.0 {net5.0}");
    assert_eq!(mailkit.dependencies().len(), 1);
    assert_eq!(mailkit.source_feed(), Some(feed.name()));

    let lowest = feed
        .resolve(&identity("MimeKit", "2.0.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lowest.identity().to_string(), "MimeKit.2.15.0");
    assert_eq!(
        lowest.download_location(),
        Some(mimekit.display().to_string().as_str())
    );

    let newer = feed
        .resolve(&identity("MimeKit", "2.16.0"), &net5())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(newer.identity().to_string(), "MimeKit.3.0.0");
}

#[tokio::test]
async fn test_unknown_package_is_none() {
    let dir = TempDir::new().unwrap();
    write_nupkg(dir.path(), "Only", "1.0.0", &[]);

    let feed = LocalFolderFeed::new(dir.path());
    assert!(
        feed.resolve(&identity("Other", "1.0.0"), &net5())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_broken_artifacts_are_skipped() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.nupkg"), "not a zip").unwrap();
    std::fs::write(dir.path().join("readme.txt"), "ignored").unwrap();
    write_nupkg(dir.path(), "Good", "1.0.0", &[]);

    let feed = LocalFolderFeed::new(dir.path());
    let found = feed
        .resolve(&identity("Good", "1.0.0"), &net5())
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn test_index_is_built_once_per_session() {
    let dir = TempDir::new().unwrap();
    write_nupkg(dir.path(), "First", "1.0.0", &[]);

    let feed = LocalFolderFeed::new(dir.path());
    assert!(
        feed.resolve(&identity("First", "1.0.0"), &net5())
            .await
            .unwrap()
            .is_some()
    );

    // Added after the first lookup, so invisible to this session
    write_nupkg(dir.path(), "Second", "1.0.0", &[]);
    assert!(
        feed.resolve(&identity("Second", "1.0.0"), &net5())
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        LocalFolderFeed::new(dir.path())
            .resolve(&identity("Second", "1.0.0"), &net5())
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_missing_folder_is_a_permanent_error() {
    let dir = TempDir::new().unwrap();
    let feed = LocalFolderFeed::new(dir.path().join("does-not-exist"));

    let error = feed
        .resolve(&identity("Any", "1.0.0"), &net5())
        .await
        .unwrap_err();
    assert!(matches!(error, FeedError::Artifact { .. }));
    assert!(!error.is_transient());
}
