//! NuGet V3 HTTP feed
//!
//! Lookups go through the registration resource advertised by the service
//! index:
//!
//! 1. `GET <service index>` -> `RegistrationsBaseUrl` (once per session)
//! 2. `GET <base>/<id-lower>/index.json` -> registration pages
//! 3. pages without inline items are fetched on demand
//! 4. each leaf's catalog entry carries the version and dependency groups

use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use super::{FeedClient, FeedError, nearest_at_or_above};
use crate::networking::NetworkingManager;
use crate::package::{
    DependencyEdge, DependencyGroup, Framework, PackageDescriptor, PackageIdentity,
    PackageVersion, VersionRange,
};

/// Registration resource types, most preferred first
const REGISTRATION_TYPES: &[&str] = &[
    "RegistrationsBaseUrl/3.6.0",
    "RegistrationsBaseUrl/3.4.0",
    "RegistrationsBaseUrl/3.0.0-rc",
    "RegistrationsBaseUrl/3.0.0-beta",
    "RegistrationsBaseUrl",
];

#[derive(Debug, Deserialize)]
struct ServiceIndex {
    resources: Vec<ServiceResource>,
}

#[derive(Debug, Deserialize)]
struct ServiceResource {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type")]
    resource_type: String,
}

#[derive(Debug, Deserialize)]
struct RegistrationIndex {
    #[serde(default)]
    items: Vec<RegistrationPage>,
}

#[derive(Debug, Deserialize)]
struct RegistrationPage {
    #[serde(rename = "@id")]
    id: String,
    upper: String,
    #[serde(default)]
    items: Option<Vec<RegistrationLeaf>>,
}

#[derive(Debug, Deserialize)]
struct RegistrationPageItems {
    #[serde(default)]
    items: Vec<RegistrationLeaf>,
}

#[derive(Debug, Deserialize)]
struct RegistrationLeaf {
    /// Inline object in pages, a URL in standalone leaf documents
    #[serde(rename = "catalogEntry")]
    catalog_entry: serde_json::Value,
    #[serde(rename = "packageContent", default)]
    package_content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    id: String,
    version: String,
    #[serde(default)]
    listed: Option<bool>,
    #[serde(default)]
    dependency_groups: Vec<CatalogDependencyGroup>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDependencyGroup {
    #[serde(default)]
    target_framework: Option<String>,
    #[serde(default)]
    dependencies: Vec<CatalogDependency>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogDependency {
    id: String,
    #[serde(default)]
    range: Option<String>,
}

#[derive(Debug)]
struct Candidate {
    version: PackageVersion,
    entry: CatalogEntry,
    package_content: Option<String>,
}

/// Remote feed speaking the NuGet V3 protocol
#[derive(Debug)]
pub struct HttpFeed {
    index_url: String,
    networking: NetworkingManager,
    registration_base: OnceCell<String>,
}

impl HttpFeed {
    /// `index_url` is the service index, e.g. `https://api.nuget.org/v3/index.json`
    pub fn new(index_url: impl Into<String>, networking: NetworkingManager) -> Self {
        Self {
            index_url: index_url.into(),
            networking,
            registration_base: OnceCell::new(),
        }
    }

    fn protocol_error(&self, message: impl Into<String>) -> FeedError {
        FeedError::Protocol {
            feed: self.index_url.clone(),
            message: message.into(),
        }
    }

    async fn registration_base(&self) -> Result<&str, FeedError> {
        let base = self
            .registration_base
            .get_or_try_init(|| async {
                trace!("Reading service index {}", self.index_url);
                let index: ServiceIndex = self
                    .networking
                    .get_json(&self.index_url)
                    .await?
                    .ok_or_else(|| self.protocol_error("service index not found"))?;

                let base = REGISTRATION_TYPES
                    .iter()
                    .find_map(|wanted| {
                        index
                            .resources
                            .iter()
                            .find(|resource| resource.resource_type == *wanted)
                    })
                    .map(|resource| resource.id.trim_end_matches('/').to_string())
                    .ok_or_else(|| self.protocol_error("no RegistrationsBaseUrl resource"))?;

                debug!("Using registration base {} for {}", base, self.index_url);
                Ok::<_, FeedError>(base)
            })
            .await?;
        Ok(base.as_str())
    }

    async fn page_leaves(&self, page: RegistrationPage) -> Result<Vec<RegistrationLeaf>, FeedError> {
        if let Some(items) = page.items {
            return Ok(items);
        }

        trace!("Fetching registration page {}", page.id);
        let fetched: RegistrationPageItems = self
            .networking
            .get_json(&page.id)
            .await?
            .ok_or_else(|| self.protocol_error(format!("registration page {} not found", page.id)))?;
        Ok(fetched.items)
    }

    async fn catalog_entry(&self, leaf: &RegistrationLeaf) -> Result<CatalogEntry, FeedError> {
        match &leaf.catalog_entry {
            serde_json::Value::String(url) => self
                .networking
                .get_json(url)
                .await?
                .ok_or_else(|| self.protocol_error(format!("catalog entry {} not found", url))),
            value => Ok(serde_json::from_value(value.clone())?),
        }
    }

    fn to_descriptor(
        &self,
        candidate: Candidate,
        platform: &Framework,
    ) -> Result<PackageDescriptor, FeedError> {
        let mut groups = Vec::with_capacity(candidate.entry.dependency_groups.len());

        for group in candidate.entry.dependency_groups {
            let target = match group.target_framework.as_deref() {
                None | Some("") => Framework::any(),
                Some(name) => match name.parse::<Framework>() {
                    Ok(framework) => framework,
                    Err(_) => {
                        trace!("Skipping group for unsupported framework {}", name);
                        continue;
                    }
                },
            };

            let dependencies = group
                .dependencies
                .into_iter()
                .map(|dependency| {
                    let range = match dependency.range.as_deref() {
                        Some(text) => text.parse::<VersionRange>().map_err(|e| {
                            self.protocol_error(format!("dependency {}: {}", dependency.id, e))
                        })?,
                        None => VersionRange::all(),
                    };
                    Ok(DependencyEdge::new(dependency.id, range))
                })
                .collect::<Result<Vec<_>, FeedError>>()?;

            groups.push(DependencyGroup::new(target, dependencies));
        }

        let identity = PackageIdentity::new(candidate.entry.id, candidate.version);
        let mut descriptor = PackageDescriptor::new(identity, platform.clone())
            .with_dependencies(DependencyGroup::select_nearest(&groups, platform))
            .with_source_feed(self.index_url.clone());
        if let Some(location) = candidate.package_content {
            descriptor = descriptor.with_download_location(location);
        }
        Ok(descriptor)
    }
}

impl FeedClient for HttpFeed {
    fn name(&self) -> &str {
        &self.index_url
    }

    async fn resolve(
        &self,
        hint: &PackageIdentity,
        platform: &Framework,
    ) -> Result<Option<PackageDescriptor>, FeedError> {
        let base = self.registration_base().await?;
        let url = format!("{}/{}/index.json", base, hint.normalized_id());

        let Some(index) = self.networking.get_json::<RegistrationIndex>(&url).await? else {
            trace!("{} is not published on {}", hint.id(), self.index_url);
            return Ok(None);
        };

        // Pages are ordered by version, so the first page with a match holds the lowest one
        for page in index.items {
            let upper: PackageVersion = page
                .upper
                .parse()
                .map_err(|e| self.protocol_error(format!("page bound: {}", e)))?;
            if upper < *hint.version() {
                continue;
            }

            let mut candidates = Vec::new();
            for leaf in self.page_leaves(page).await? {
                let entry = self.catalog_entry(&leaf).await?;
                let version: PackageVersion = entry
                    .version
                    .parse()
                    .map_err(|e| self.protocol_error(format!("catalog version: {}", e)))?;

                let unlisted = entry.listed == Some(false);
                if unlisted && version != *hint.version() {
                    continue;
                }

                candidates.push(Candidate {
                    version,
                    entry,
                    package_content: leaf.package_content,
                });
            }

            let picked = nearest_at_or_above(
                candidates.iter().map(|candidate| (&candidate.version, candidate)),
                hint,
            )
            .map(|candidate| candidate.version.clone());

            if let Some(version) = picked {
                let position = candidates
                    .iter()
                    .position(|candidate| candidate.version == version);
                if let Some(position) = position {
                    let candidate = candidates.swap_remove(position);
                    debug!("{} resolved {} to {}", self.index_url, hint, candidate.version);
                    return self.to_descriptor(candidate, platform).map(Some);
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    include!("http.test.rs");
}
