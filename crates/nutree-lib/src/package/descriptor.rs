//! Package descriptors and their dependency edges

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{Framework, PackageIdentity, VersionRange};

/// A declared dependency: target id plus acceptable version range
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyEdge {
    target_id: String,
    range: VersionRange,
}

impl DependencyEdge {
    pub fn new(target_id: impl Into<String>, range: VersionRange) -> Self {
        Self {
            target_id: target_id.into(),
            range,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn range(&self) -> &VersionRange {
        &self.range
    }

    pub fn targets(&self, id: &str) -> bool {
        self.target_id.eq_ignore_ascii_case(id)
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.target_id, self.range)
    }
}

/// Dependencies a package declares for one target framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGroup {
    pub target: Framework,
    pub dependencies: Vec<DependencyEdge>,
}

impl DependencyGroup {
    pub fn new(target: Framework, dependencies: Vec<DependencyEdge>) -> Self {
        Self {
            target,
            dependencies,
        }
    }

    /// Dependencies of the group nearest to `platform`
    ///
    /// A package whose groups are all incompatible contributes no edges.
    pub fn select_nearest(groups: &[DependencyGroup], platform: &Framework) -> Vec<DependencyEdge> {
        let nearest = platform.nearest(groups.iter().map(|group| &group.target));
        nearest
            .and_then(|target| groups.iter().find(|group| &group.target == target))
            .map(|group| group.dependencies.clone())
            .unwrap_or_default()
    }
}

/// Metadata for one package version as seen for a particular target framework
#[derive(Debug, Clone)]
pub struct PackageDescriptor {
    identity: PackageIdentity,
    platform: Framework,
    dependencies: Vec<DependencyEdge>,
    download_location: Option<String>,
    source_feed: Option<String>,
}

impl PackageDescriptor {
    pub fn new(identity: PackageIdentity, platform: Framework) -> Self {
        Self {
            identity,
            platform,
            dependencies: Vec::new(),
            download_location: None,
            source_feed: None,
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<DependencyEdge>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_download_location(mut self, location: impl Into<String>) -> Self {
        self.download_location = Some(location.into());
        self
    }

    pub fn with_source_feed(mut self, feed: impl Into<String>) -> Self {
        self.source_feed = Some(feed.into());
        self
    }

    pub fn identity(&self) -> &PackageIdentity {
        &self.identity
    }

    pub fn id(&self) -> &str {
        self.identity.id()
    }

    pub fn platform(&self) -> &Framework {
        &self.platform
    }

    /// Declared edges, in declaration order
    pub fn dependencies(&self) -> &[DependencyEdge] {
        &self.dependencies
    }

    pub fn download_location(&self) -> Option<&str> {
        self.download_location.as_deref()
    }

    pub fn source_feed(&self) -> Option<&str> {
        self.source_feed.as_deref()
    }

    /// `"MimeKit.2.15.0 : Portable.BouncyCastle [1.8.10, ), System.Buffers [4.5.1, )"`
    pub fn summary(&self) -> String {
        if self.dependencies.is_empty() {
            return self.identity.to_string();
        }

        let deps = self
            .dependencies
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} : {}", self.identity, deps)
    }
}

impl PartialEq for PackageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && self.platform == other.platform
    }
}

impl Eq for PackageDescriptor {}

impl Hash for PackageDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
        self.platform.hash(state);
    }
}

impl Ord for PackageDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity
            .cmp(&other.identity)
            .then_with(|| self.platform.to_string().cmp(&other.platform.to_string()))
    }
}

impl PartialOrd for PackageDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{{}}}", self.identity, self.platform)
    }
}

/// Where the root package came from, decided once at input time
#[derive(Debug, Clone)]
pub enum RootSource {
    /// Retrieved from a configured feed
    Feed(Arc<PackageDescriptor>),
    /// Read from a `.nupkg` or `.nuspec` on disk
    LocalArtifact(Arc<PackageDescriptor>),
}

impl RootSource {
    pub fn descriptor(&self) -> &Arc<PackageDescriptor> {
        match self {
            Self::Feed(descriptor) | Self::LocalArtifact(descriptor) => descriptor,
        }
    }

    pub fn identity(&self) -> &PackageIdentity {
        self.descriptor().identity()
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::LocalArtifact(_))
    }
}

#[cfg(test)]
mod tests {
    include!("descriptor.test.rs");
}
