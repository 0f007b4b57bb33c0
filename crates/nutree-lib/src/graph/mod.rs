//! # Graph Module
//!
//! From a root package to a rendered dependency tree.
//!
//! ## Modules
//!
//! - [`discovery`] - Concurrent, cancellable walk of declared edges across feeds
//! - [`resolver`] - One version per id, lowest satisfying first
//! - [`tree`] - Arena tree over the resolved set and its text rendering
//!
//! [`DependencyWalker`] ties the three together over one [`FeedSession`].

pub mod discovery;
pub mod resolver;
pub mod tree;

pub use discovery::{CandidateSet, DiscoveryError, GraphDiscoverer, RootRequest, version_hint};
pub use resolver::{ResolutionError, Resolver};
pub use tree::{DependencyTree, NodeId, TreeBuilder, TreeError, TreeNode};

use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::feed::{FeedClient, FeedError, FeedSession};
use crate::package::{Framework, PackageDescriptor, PackageIdentity, ResolvedSet};

#[derive(Debug, Error)]
pub enum WalkError {
    #[error(transparent)]
    Feed {
        #[from]
        source: FeedError,
    },

    #[error(transparent)]
    Discovery {
        #[from]
        source: DiscoveryError,
    },

    #[error(transparent)]
    Resolution {
        #[from]
        source: ResolutionError,
    },

    #[error(transparent)]
    Tree {
        #[from]
        source: TreeError,
    },
}

#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Feed lookups in flight at once during discovery
    pub max_concurrent: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self { max_concurrent: 8 }
    }
}

/// Retrieval, discovery, resolution and tree building over one feed session
#[derive(Debug)]
pub struct DependencyWalker<F> {
    session: FeedSession<F>,
    discoverer: GraphDiscoverer,
    resolver: Resolver,
    builder: TreeBuilder,
}

impl<F: FeedClient> DependencyWalker<F> {
    pub fn new(session: FeedSession<F>, config: WalkerConfig) -> Self {
        Self {
            session,
            discoverer: GraphDiscoverer::new(config.max_concurrent),
            resolver: Resolver::new(),
            builder: TreeBuilder::new(),
        }
    }

    pub fn session(&self) -> &FeedSession<F> {
        &self.session
    }

    /// Exactly `identity`, as published by the first feed that has it
    ///
    /// `None` when no feed publishes that version, even if a newer one exists.
    pub async fn retrieve(
        &self,
        identity: &PackageIdentity,
        platform: &Framework,
    ) -> Result<Option<PackageDescriptor>, WalkError> {
        Ok(self.session.resolve_exact(identity, platform).await?)
    }

    /// Every descriptor reachable from `root`, before version selection
    pub async fn discover_transitive_dependencies(
        &self,
        root: &RootRequest,
        platform: &Framework,
        cancel: &CancellationToken,
    ) -> Result<CandidateSet, WalkError> {
        Ok(self
            .discoverer
            .discover(&self.session, root, platform, cancel)
            .await?)
    }

    /// Discover from `root` and keep one version per id
    pub async fn resolve(
        &self,
        root: &RootRequest,
        platform: &Framework,
        cancel: &CancellationToken,
    ) -> Result<ResolvedSet, WalkError> {
        let candidates = self
            .discover_transitive_dependencies(root, platform, cancel)
            .await?;
        let root_id = candidates.root().identity().id().to_string();
        let resolved = self.resolver.resolve(&[root_id], &candidates)?;
        info!(
            "Resolved {} packages from {} candidates",
            resolved.len(),
            candidates.len()
        );
        Ok(resolved)
    }

    pub fn build_tree(
        &self,
        root: &Arc<PackageDescriptor>,
        resolved: &ResolvedSet,
    ) -> Result<DependencyTree, WalkError> {
        Ok(self.builder.build(root, resolved)?)
    }

    /// Resolve from `root` and build its tree in one go
    pub async fn tree(
        &self,
        root: &RootRequest,
        platform: &Framework,
        cancel: &CancellationToken,
    ) -> Result<DependencyTree, WalkError> {
        let resolved = self.resolve(root, platform, cancel).await?;
        let root = Arc::clone(resolved.root());
        self.build_tree(&root, &resolved)
    }

    pub fn render(&self, tree: &DependencyTree) -> String {
        tree.render()
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
