use super::*;
use crate::artifact::LocalArtifactReader;

#[test]
fn test_fixture_directory_is_removed_on_drop() {
    let fixture = PackageDirFixture::new().unwrap();
    let path = fixture.path().to_path_buf();
    assert!(path.exists());
    drop(fixture);
    assert!(!path.exists());
}

#[test]
fn test_written_nupkg_is_readable() {
    let fixture = PackageDirFixture::new().unwrap();
    let path = fixture
        .write_nupkg(
            "feed",
            "MimeKit",
            "2.15.0",
            &[("netstandard2.0", &[("System.Buffers", "4.5.1")])],
        )
        .unwrap();

    assert!(path.ends_with("feed/mimekit.2.15.0.nupkg"));
    let metadata = LocalArtifactReader::new().read_metadata(&path).unwrap();
    assert_eq!(metadata.identity.to_string(), "MimeKit.2.15.0");
    assert_eq!(metadata.groups.len(), 1);
}

#[test]
fn test_written_nuspec_without_groups() {
    let fixture = PackageDirFixture::new().unwrap();
    let path = fixture.write_nuspec("", "Leaf", "1.0.0", &[]).unwrap();

    let metadata = LocalArtifactReader::new().read_metadata(&path).unwrap();
    assert!(metadata.groups.is_empty());
}
