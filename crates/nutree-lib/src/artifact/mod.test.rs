use super::*;
use std::io::Write;
use tempfile::TempDir;

const NUSPEC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package>
  <metadata>
    <id>Local.Package</id>
    <version>1.2.0</version>
    <dependencies>
      <group targetFramework="netstandard2.0">
        <dependency id="System.Buffers" version="4.5.1" />
      </group>
    </dependencies>
  </metadata>
</package>"#;

fn write_nupkg(dir: &Path, file_name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(file_name);
    let file = File::create(&path).unwrap();
    let mut archive = zip::ZipWriter::new(file);
    for (name, contents) in entries {
        archive
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        archive.write_all(contents.as_bytes()).unwrap();
    }
    archive.finish().unwrap();
    path
}

#[test]
fn test_artifact_kind_from_extension() {
    assert_eq!(
        ArtifactKind::from_path(Path::new("a/b/Pkg.1.0.0.NUPKG")),
        Some(ArtifactKind::Nupkg)
    );
    assert_eq!(
        ArtifactKind::from_path(Path::new("Pkg.nuspec")),
        Some(ArtifactKind::Nuspec)
    );
    assert_eq!(ArtifactKind::from_path(Path::new("Pkg.zip")), None);
}

#[test]
fn test_read_root_from_nupkg() {
    let dir = TempDir::new().unwrap();
    let path = write_nupkg(
        dir.path(),
        "Local.Package.1.2.0.nupkg",
        &[
            ("lib/netstandard2.0/Local.Package.dll", "binary"),
            ("Local.Package.nuspec", NUSPEC),
        ],
    );

    let descriptor = LocalArtifactReader::new()
        .read_root(&path, &"net5.0".parse().unwrap())
        .unwrap();

    assert_eq!(descriptor.to_string(), "Local.Package.1.2.0 {net5.0}");
    assert_eq!(descriptor.dependencies().len(), 1);
    assert_eq!(
        descriptor.download_location(),
        Some(path.display().to_string().as_str())
    );
}

#[test]
fn test_read_metadata_from_bare_nuspec() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Local.Package.nuspec");
    std::fs::write(&path, NUSPEC).unwrap();

    let metadata = LocalArtifactReader::new().read_metadata(&path).unwrap();
    assert_eq!(metadata.identity.to_string(), "Local.Package.1.2.0");
}

#[test]
fn test_nupkg_without_root_manifest() {
    let dir = TempDir::new().unwrap();
    let path = write_nupkg(
        dir.path(),
        "Broken.nupkg",
        &[("nested/Broken.nuspec", NUSPEC)],
    );

    let error = LocalArtifactReader::new().read_metadata(&path).unwrap_err();
    assert!(matches!(error, ArtifactError::MissingNuspec { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let error = LocalArtifactReader::new()
        .read_metadata(&dir.path().join("absent.nuspec"))
        .unwrap_err();
    assert!(matches!(error, ArtifactError::Io { .. }));
}

#[test]
fn test_not_a_zip_archive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fake.nupkg");
    std::fs::write(&path, "definitely not a zip").unwrap();

    let error = LocalArtifactReader::new().read_metadata(&path).unwrap_err();
    assert!(matches!(error, ArtifactError::Zip { .. }));
}

#[tokio::test]
async fn test_load_root_async() {
    let dir = TempDir::new().unwrap();
    let path = write_nupkg(
        dir.path(),
        "Local.Package.1.2.0.nupkg",
        &[("Local.Package.nuspec", NUSPEC)],
    );

    let descriptor = LocalArtifactReader::new()
        .load_root(path, "net5.0".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(descriptor.identity().to_string(), "Local.Package.1.2.0");
}
