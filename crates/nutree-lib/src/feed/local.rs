//! Folder-backed feed of `.nupkg` / `.nuspec` files

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, trace, warn};

use super::{FeedClient, FeedError, nearest_at_or_above};
use crate::artifact::{ArtifactError, ArtifactKind, LocalArtifactReader, NuspecMetadata};
use crate::package::{Framework, PackageDescriptor, PackageIdentity, PackageVersion};

#[derive(Debug)]
struct LocalEntry {
    path: PathBuf,
    metadata: NuspecMetadata,
}

/// Lowercase id -> version -> manifest
type LocalIndex = HashMap<String, BTreeMap<PackageVersion, LocalEntry>>;

/// Feed reading a directory tree of package artifacts
///
/// The directory is scanned once per session, on first use.
#[derive(Debug)]
pub struct LocalFolderFeed {
    root: PathBuf,
    name: String,
    reader: LocalArtifactReader,
    index: OnceCell<Arc<LocalIndex>>,
}

impl LocalFolderFeed {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: root.display().to_string(),
            root,
            reader: LocalArtifactReader::new(),
            index: OnceCell::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn index(&self) -> Result<Arc<LocalIndex>, FeedError> {
        let index = self
            .index
            .get_or_try_init(|| async {
                let root = self.root.clone();
                let reader = self.reader;
                let index = tokio::task::spawn_blocking(move || scan(&root, reader))
                    .await
                    .map_err(ArtifactError::from)??;
                Ok::<_, FeedError>(Arc::new(index))
            })
            .await?;
        Ok(Arc::clone(index))
    }
}

fn scan(root: &Path, reader: LocalArtifactReader) -> Result<LocalIndex, ArtifactError> {
    let io_error = |path: &Path, source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut artifacts = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).map_err(|e| io_error(&dir, e))? {
            let path = entry.map_err(|e| io_error(&dir, e))?.path();
            if path.is_dir() {
                pending.push(path);
            } else if ArtifactKind::from_path(&path).is_some() {
                artifacts.push(path);
            }
        }
    }

    // Sorted so the winner among duplicate identities is stable
    artifacts.sort();

    let mut index = LocalIndex::new();
    for path in artifacts {
        let metadata = match reader.read_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Ignoring unreadable package {}: {}", path.display(), e);
                continue;
            }
        };

        trace!("Indexed {} from {}", metadata.identity, path.display());
        index
            .entry(metadata.identity.normalized_id())
            .or_default()
            .entry(metadata.identity.version().clone())
            .or_insert(LocalEntry { path, metadata });
    }

    debug!("Indexed {} package ids under {}", index.len(), root.display());
    Ok(index)
}

impl FeedClient for LocalFolderFeed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(
        &self,
        hint: &PackageIdentity,
        platform: &Framework,
    ) -> Result<Option<PackageDescriptor>, FeedError> {
        let index = self.index().await?;

        let Some(versions) = index.get(&hint.normalized_id()) else {
            return Ok(None);
        };

        let found = nearest_at_or_above(versions.iter(), hint).map(|entry| {
            entry
                .metadata
                .clone()
                .into_descriptor(platform)
                .with_download_location(entry.path.display().to_string())
                .with_source_feed(self.name.clone())
        });

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    include!("local.test.rs");
}
