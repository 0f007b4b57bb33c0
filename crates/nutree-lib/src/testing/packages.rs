//! Scratch package folders for local feed and artifact tests

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory of package artifacts, removed on drop
pub struct PackageDirFixture {
    pub temp_dir: TempDir,
}

impl PackageDirFixture {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Manifest XML with one dependency group per `(framework, deps)` entry
    pub fn nuspec(id: &str, version: &str, groups: &[(&str, &[(&str, &str)])]) -> String {
        let groups: String = groups
            .iter()
            .map(|(framework, deps)| {
                let deps: String = deps
                    .iter()
                    .map(|(dep, range)| {
                        format!(r#"<dependency id="{}" version="{}" />"#, dep, range)
                    })
                    .collect();
                format!(r#"<group targetFramework="{}">{}</group>"#, framework, deps)
            })
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>{}</id>
    <version>{}</version>
    <dependencies>{}</dependencies>
  </metadata>
</package>"#,
            id, version, groups
        )
    }

    /// Write `<id>.<version>.nupkg` (relative to the fixture root) holding the manifest
    pub fn write_nupkg(
        &self,
        subdir: &str,
        id: &str,
        version: &str,
        groups: &[(&str, &[(&str, &str)])],
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let dir = self.path().join(subdir);
        fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.{}.nupkg", id.to_lowercase(), version));
        let mut archive = zip::ZipWriter::new(File::create(&path)?);
        archive.start_file(
            format!("{}.nuspec", id),
            zip::write::SimpleFileOptions::default(),
        )?;
        archive.write_all(Self::nuspec(id, version, groups).as_bytes())?;
        archive.finish()?;
        Ok(path)
    }

    /// Write a bare `.nuspec` manifest
    pub fn write_nuspec(
        &self,
        subdir: &str,
        id: &str,
        version: &str,
        groups: &[(&str, &[(&str, &str)])],
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let dir = self.path().join(subdir);
        fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.{}.nuspec", id, version));
        fs::write(&path, Self::nuspec(id, version, groups))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    include!("packages.test.rs");
}
