//! `.nuspec` manifest model

use serde::Deserialize;
use std::path::Path;

use super::ArtifactError;
use crate::package::{
    DependencyEdge, DependencyGroup, Framework, PackageDescriptor, PackageIdentity, PackageVersion,
    VersionRange,
};

#[derive(Debug, Deserialize)]
struct NuspecDocument {
    metadata: MetadataElement,
}

#[derive(Debug, Deserialize)]
struct MetadataElement {
    id: String,
    version: String,
    #[serde(default)]
    dependencies: Option<DependenciesElement>,
}

#[derive(Debug, Default, Deserialize)]
struct DependenciesElement {
    #[serde(default, rename = "group")]
    groups: Vec<GroupElement>,
    #[serde(default, rename = "dependency")]
    dependencies: Vec<DependencyElement>,
}

#[derive(Debug, Deserialize)]
struct GroupElement {
    #[serde(default, rename = "@targetFramework")]
    target_framework: Option<String>,
    #[serde(default, rename = "dependency")]
    dependencies: Vec<DependencyElement>,
}

#[derive(Debug, Deserialize)]
struct DependencyElement {
    #[serde(rename = "@id")]
    id: String,
    #[serde(default, rename = "@version")]
    version: Option<String>,
}

/// Identity and dependency groups declared by a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NuspecMetadata {
    pub identity: PackageIdentity,
    pub groups: Vec<DependencyGroup>,
}

impl NuspecMetadata {
    /// Parse manifest XML; `origin` is only used in error messages
    pub fn parse(xml: &str, origin: &Path) -> Result<Self, ArtifactError> {
        let invalid = |reason: String| ArtifactError::InvalidMetadata {
            path: origin.to_path_buf(),
            reason,
        };

        let document: NuspecDocument =
            quick_xml::de::from_str(xml).map_err(|source| ArtifactError::Xml {
                path: origin.to_path_buf(),
                source,
            })?;
        let metadata = document.metadata;

        let id = metadata.id.trim();
        if id.is_empty() {
            return Err(invalid("package id is empty".to_string()));
        }
        let version = metadata
            .version
            .parse::<PackageVersion>()
            .map_err(|e| invalid(e.to_string()))?;

        let to_edges = |elements: Vec<DependencyElement>| {
            elements
                .into_iter()
                .map(|element| {
                    let range = match element.version.as_deref() {
                        Some(text) => text.parse::<VersionRange>().map_err(|e| {
                            invalid(format!("dependency {}: {}", element.id, e))
                        })?,
                        None => VersionRange::all(),
                    };
                    Ok(DependencyEdge::new(element.id.trim(), range))
                })
                .collect::<Result<Vec<_>, ArtifactError>>()
        };

        let declared = metadata.dependencies.unwrap_or_default();
        let mut groups = Vec::with_capacity(declared.groups.len() + 1);

        for group in declared.groups {
            let target = match group.target_framework.as_deref() {
                Some(name) => name
                    .parse::<Framework>()
                    .map_err(|e| invalid(e.to_string()))?,
                None => Framework::any(),
            };
            groups.push(DependencyGroup::new(target, to_edges(group.dependencies)?));
        }

        // Flat dependency lists predate groups and apply to every framework
        if !declared.dependencies.is_empty() {
            groups.push(DependencyGroup::new(
                Framework::any(),
                to_edges(declared.dependencies)?,
            ));
        }

        Ok(Self {
            identity: PackageIdentity::new(id, version),
            groups,
        })
    }

    pub fn into_descriptor(self, platform: &Framework) -> PackageDescriptor {
        let dependencies = DependencyGroup::select_nearest(&self.groups, platform);
        PackageDescriptor::new(self.identity, platform.clone()).with_dependencies(dependencies)
    }
}

#[cfg(test)]
mod tests {
    include!("nuspec.test.rs");
}
