//! Reading package metadata from `.nupkg` archives and `.nuspec` manifests

pub mod nuspec;

pub use nuspec::NuspecMetadata;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

use crate::package::{Framework, PackageDescriptor};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open package archive {path}: {source}")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("Failed to parse nuspec in {path}: {source}")]
    Xml {
        path: PathBuf,
        source: quick_xml::DeError,
    },

    #[error("No .nuspec manifest found in {path}")]
    MissingNuspec { path: PathBuf },

    #[error("Invalid package metadata in {path}: {reason}")]
    InvalidMetadata { path: PathBuf, reason: String },

    #[error("Artifact reader task failed: {source}")]
    TaskFailed {
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Artifact kinds recognised by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Nupkg,
    Nuspec,
}

impl ArtifactKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "nupkg" => Some(Self::Nupkg),
            "nuspec" => Some(Self::Nuspec),
            _ => None,
        }
    }
}

/// Reads local package artifacts into descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalArtifactReader;

impl LocalArtifactReader {
    pub fn new() -> Self {
        Self
    }

    /// Parse the manifest of a `.nupkg` or `.nuspec` file
    pub fn read_metadata(&self, path: &Path) -> Result<NuspecMetadata, ArtifactError> {
        trace!("Reading package metadata from {}", path.display());

        let xml = match ArtifactKind::from_path(path) {
            Some(ArtifactKind::Nupkg) => self.read_nuspec_from_archive(path)?,
            Some(ArtifactKind::Nuspec) => {
                std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => {
                return Err(ArtifactError::InvalidMetadata {
                    path: path.to_path_buf(),
                    reason: "expected a .nupkg or .nuspec file".to_string(),
                });
            }
        };

        NuspecMetadata::parse(&xml, path)
    }

    /// Descriptor for the package at `path` as consumed by `platform`
    pub fn read_root(
        &self,
        path: &Path,
        platform: &Framework,
    ) -> Result<PackageDescriptor, ArtifactError> {
        let metadata = self.read_metadata(path)?;
        let descriptor = metadata
            .into_descriptor(platform)
            .with_download_location(path.display().to_string());

        debug!("Read local package {}", descriptor);
        Ok(descriptor)
    }

    /// [`read_root`](Self::read_root) on the blocking thread pool
    pub async fn load_root(
        &self,
        path: PathBuf,
        platform: Framework,
    ) -> Result<PackageDescriptor, ArtifactError> {
        let reader = *self;
        tokio::task::spawn_blocking(move || reader.read_root(&path, &platform)).await?
    }

    fn read_nuspec_from_archive(&self, path: &Path) -> Result<String, ArtifactError> {
        let zip_error = |source| ArtifactError::Zip {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(zip_error)?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(zip_error)?;
            let name = entry.name().to_string();
            if name.contains('/') || !name.to_ascii_lowercase().ends_with(".nuspec") {
                continue;
            }

            trace!("Found manifest {} in {}", name, path.display());
            let mut xml = String::new();
            entry
                .read_to_string(&mut xml)
                .map_err(|source| ArtifactError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            return Ok(xml);
        }

        Err(ArtifactError::MissingNuspec {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
