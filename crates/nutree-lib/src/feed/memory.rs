//! Programmatic feed backed by in-process data

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::trace;

use super::{FeedClient, FeedError, nearest_at_or_above};
use crate::package::{
    DependencyEdge, DependencyGroup, Framework, PackageDescriptor, PackageIdentity,
    PackageVersion, normalize_id,
};

#[derive(Debug, Clone)]
struct Published {
    identity: PackageIdentity,
    groups: Vec<DependencyGroup>,
}

/// Feed whose packages are registered in code
///
/// Can simulate transient outages per id and a fixed response latency.
#[derive(Debug)]
pub struct InMemoryFeed {
    name: String,
    packages: BTreeMap<String, BTreeMap<PackageVersion, Published>>,
    transient_failures: Mutex<HashMap<String, u32>>,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl InMemoryFeed {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            packages: BTreeMap::new(),
            transient_failures: Mutex::new(HashMap::new()),
            latency: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Publish a package whose dependencies apply to every framework
    pub fn with_package(self, identity: PackageIdentity, dependencies: Vec<DependencyEdge>) -> Self {
        self.with_groups(
            identity,
            vec![DependencyGroup::new(Framework::any(), dependencies)],
        )
    }

    /// Publish a package with per-framework dependency groups
    pub fn with_groups(mut self, identity: PackageIdentity, groups: Vec<DependencyGroup>) -> Self {
        self.packages
            .entry(identity.normalized_id())
            .or_default()
            .insert(identity.version().clone(), Published { identity, groups });
        self
    }

    /// Fail the next `count` lookups of `id` with a transient error
    pub fn with_transient_failures(self, id: &str, count: u32) -> Self {
        if let Ok(mut failures) = self.transient_failures.lock() {
            failures.insert(normalize_id(id), count);
        }
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of `resolve` calls answered so far, failures included
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn take_failure(&self, id: &str) -> bool {
        let Ok(mut failures) = self.transient_failures.lock() else {
            return false;
        };
        match failures.get_mut(&normalize_id(id)) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

impl FeedClient for InMemoryFeed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(
        &self,
        hint: &PackageIdentity,
        platform: &Framework,
    ) -> Result<Option<PackageDescriptor>, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.take_failure(hint.id()) {
            trace!("{}: simulated outage for {}", self.name, hint);
            return Err(FeedError::Transient {
                feed: self.name.clone(),
                message: format!("simulated outage for {}", hint.id()),
            });
        }

        let Some(versions) = self.packages.get(&hint.normalized_id()) else {
            return Ok(None);
        };

        let found = nearest_at_or_above(versions.iter(), hint).map(|published| {
            let dependencies = DependencyGroup::select_nearest(&published.groups, platform);
            PackageDescriptor::new(published.identity.clone(), platform.clone())
                .with_dependencies(dependencies)
                .with_source_feed(self.name.clone())
        });

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    include!("memory.test.rs");
}
