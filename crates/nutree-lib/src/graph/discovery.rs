//! Transitive dependency discovery across feeds
//!
//! Explicit worklist of `(requiring package, edge)` items; lookups run
//! concurrently up to a fixed limit. A hint identity is claimed before its
//! lookup is issued, so no identity is ever fetched twice.

use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, trace};

use crate::feed::{FeedClient, FeedError, FeedSession};
use crate::package::{
    DependencyEdge, Framework, PackageDescriptor, PackageIdentity, PackageVersion, RootSource,
    VersionRange,
};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Unable to resolve dependency {id} {range} (required by {required_by}): {reason}")]
    UnresolvableDependency {
        id: String,
        range: VersionRange,
        required_by: String,
        reason: String,
    },

    #[error("Feed lookup failed: {source}")]
    Feed {
        #[from]
        source: FeedError,
    },

    #[error("Dependency discovery was cancelled")]
    Cancelled,
}

/// What discovery starts from
#[derive(Debug, Clone)]
pub enum RootRequest {
    /// Root looked up on the feeds first
    Identity(PackageIdentity),
    /// Root descriptor already known
    Source(RootSource),
}

/// Every descriptor discovered from a root, not yet reduced to one per id
#[derive(Debug, Clone)]
pub struct CandidateSet {
    packages: BTreeMap<PackageIdentity, Arc<PackageDescriptor>>,
    root: RootSource,
}

impl CandidateSet {
    pub fn new<I>(root: RootSource, packages: I) -> Self
    where
        I: IntoIterator<Item = Arc<PackageDescriptor>>,
    {
        let packages = packages
            .into_iter()
            .map(|descriptor| (descriptor.identity().clone(), descriptor))
            .collect();
        Self { packages, root }
    }

    pub fn root(&self) -> &RootSource {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn contains(&self, identity: &PackageIdentity) -> bool {
        self.packages.contains_key(identity)
    }

    pub fn get(&self, identity: &PackageIdentity) -> Option<&Arc<PackageDescriptor>> {
        self.packages.get(identity)
    }

    /// Descriptors ordered by identity
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PackageDescriptor>> {
        self.packages.values()
    }

    /// Every discovered version of `id`, lowest first
    pub fn versions_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Arc<PackageDescriptor>> {
        self.packages
            .iter()
            .filter(move |(identity, _)| identity.has_id(id))
            .map(|(_, descriptor)| descriptor)
    }
}

/// Version to ask the feeds for when following `range`
///
/// The lower bound, or the smallest version above an exclusive lower bound.
/// Ranges without a lower bound start from `0.0.0`.
pub fn version_hint(range: &VersionRange) -> PackageVersion {
    match range.min_version() {
        Some(min) if range.is_min_inclusive() => min.clone(),
        Some(min) => min
            .next_prerelease()
            .unwrap_or_else(|| min.clone().with_revision(min.revision() + 1)),
        None => PackageVersion::zero(),
    }
}

#[derive(Debug)]
struct WorkItem {
    required_by: String,
    edge: DependencyEdge,
    hint: PackageIdentity,
}

impl WorkItem {
    fn for_edge(required_by: &PackageIdentity, edge: &DependencyEdge) -> Self {
        Self {
            required_by: required_by.to_string(),
            hint: PackageIdentity::new(edge.target_id(), version_hint(edge.range())),
            edge: edge.clone(),
        }
    }

    /// Turn a lookup result into the descriptors to keep, or a classified error
    fn accept(
        &self,
        result: Result<Vec<PackageDescriptor>, FeedError>,
    ) -> Result<Vec<PackageDescriptor>, DiscoveryError> {
        match result {
            Ok(found) if found.is_empty() => {
                Err(self.unresolvable("no matching version on any configured feed"))
            }
            Ok(found) => Ok(found),
            Err(e) if e.is_transient() => Err(self.unresolvable(format!("every feed failed: {}", e))),
            Err(e) => Err(DiscoveryError::Feed { source: e }),
        }
    }

    fn unresolvable(&self, reason: impl Into<String>) -> DiscoveryError {
        DiscoveryError::UnresolvableDependency {
            id: self.edge.target_id().to_string(),
            range: self.edge.range().clone(),
            required_by: self.required_by.clone(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphDiscoverer {
    max_concurrent: usize,
}

impl Default for GraphDiscoverer {
    fn default() -> Self {
        Self::new(8)
    }
}

impl GraphDiscoverer {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Walk every declared edge reachable from `root` and collect the
    /// descriptors the feeds return for them
    pub async fn discover<F: FeedClient>(
        &self,
        session: &FeedSession<F>,
        root: &RootRequest,
        platform: &Framework,
        cancel: &CancellationToken,
    ) -> Result<CandidateSet, DiscoveryError> {
        let span = crate::progress_span!("discovering dependencies");
        self.walk(session, root, platform, cancel)
            .instrument(span)
            .await
    }

    /// Look up a root given by identity; only an exact match is accepted
    async fn fetch_root<F: FeedClient>(
        &self,
        session: &FeedSession<F>,
        identity: &PackageIdentity,
        platform: &Framework,
        cancel: &CancellationToken,
    ) -> Result<PackageDescriptor, DiscoveryError> {
        let item = WorkItem {
            required_by: "the root request".to_string(),
            edge: DependencyEdge::new(identity.id(), VersionRange::exact(identity.version().clone())),
            hint: identity.clone(),
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DiscoveryError::Cancelled),
            result = session.resolve_all(identity, platform) => result,
        };

        let found = item.accept(result)?;
        found
            .into_iter()
            .find(|descriptor| descriptor.identity() == identity)
            .ok_or_else(|| item.unresolvable("root package not found on any configured feed"))
    }

    async fn walk<F: FeedClient>(
        &self,
        session: &FeedSession<F>,
        root: &RootRequest,
        platform: &Framework,
        cancel: &CancellationToken,
    ) -> Result<CandidateSet, DiscoveryError> {
        if cancel.is_cancelled() {
            return Err(DiscoveryError::Cancelled);
        }

        let root = match root {
            RootRequest::Source(source) => source.clone(),
            RootRequest::Identity(identity) => RootSource::Feed(Arc::new(
                self.fetch_root(session, identity, platform, cancel).await?,
            )),
        };

        let mut worklist = VecDeque::new();
        let mut claimed: HashSet<PackageIdentity> = HashSet::new();
        let mut candidates: BTreeMap<PackageIdentity, Arc<PackageDescriptor>> = BTreeMap::new();

        // A local root is never looked up; its edges come from the artifact
        let root_descriptor = root.descriptor();
        claimed.insert(root_descriptor.identity().clone());
        if let RootSource::Feed(descriptor) = &root {
            candidates.insert(descriptor.identity().clone(), Arc::clone(descriptor));
        }
        for edge in root_descriptor.dependencies() {
            let item = WorkItem::for_edge(root_descriptor.identity(), edge);
            if claimed.insert(item.hint.clone()) {
                worklist.push_back(item);
            }
        }

        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < self.max_concurrent {
                let Some(item) = worklist.pop_front() else {
                    break;
                };
                trace!("Looking up {} for {}", item.hint, item.required_by);
                in_flight.push(async move {
                    let result = session.resolve_all(&item.hint, platform).await;
                    (item, result)
                });
            }

            if in_flight.is_empty() {
                break;
            }

            let pending = in_flight.len();
            let (item, result) = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Discovery cancelled with {} lookups in flight", pending);
                    return Err(DiscoveryError::Cancelled);
                }
                Some(done) = in_flight.next() => done,
            };

            for descriptor in item.accept(result)? {
                let identity = descriptor.identity().clone();
                if candidates.contains_key(&identity) || (root.is_local() && identity == *root.identity()) {
                    continue;
                }

                let descriptor = Arc::new(descriptor);
                debug!("Discovered {}", descriptor);

                for edge in descriptor.dependencies() {
                    let next = WorkItem::for_edge(&identity, edge);
                    if claimed.insert(next.hint.clone()) {
                        worklist.push_back(next);
                    }
                }
                candidates.insert(identity, descriptor);
            }
        }

        debug!("Discovered {} candidate packages", candidates.len());
        Ok(CandidateSet {
            packages: candidates,
            root,
        })
    }
}

#[cfg(test)]
mod tests {
    include!("discovery.test.rs");
}
