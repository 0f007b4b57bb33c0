//! # Feed Module
//!
//! Package sources that answer "does package X at version Y (or the nearest
//! version above it) exist, and what does it depend on".
//!
//! ## Modules
//!
//! - [`session`] - Ordered feed list with retry and timeout policy
//! - [`http`] - NuGet V3 HTTP feeds
//! - [`local`] - Folders of `.nupkg` / `.nuspec` files
//! - [`memory`] - Programmatic feeds for tests and fixtures

pub mod http;
pub mod local;
pub mod memory;
pub mod session;

pub use http::HttpFeed;
pub use local::LocalFolderFeed;
pub use memory::InMemoryFeed;
pub use session::FeedSession;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::networking::{NetworkingError, NetworkingManager, Retryable};
use crate::package::{Framework, PackageDescriptor, PackageIdentity};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed {feed} is temporarily unavailable: {message}")]
    Transient { feed: String, message: String },

    #[error("Feed {feed} did not answer within {after:?}")]
    Timeout { feed: String, after: Duration },

    #[error("Feed {feed} returned an unexpected response: {message}")]
    Protocol { feed: String, message: String },

    #[error("JSON parsing failed: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Network error: {source}")]
    Networking {
        #[from]
        source: NetworkingError,
    },

    #[error("Local package error: {source}")]
    Artifact {
        #[from]
        source: ArtifactError,
    },
}

impl FeedError {
    /// Whether repeating the same call may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transient { .. } | Self::Timeout { .. } => true,
            Self::Networking { source } => source.is_transient(),
            Self::Protocol { .. } | Self::Json { .. } | Self::Artifact { .. } => false,
        }
    }
}

impl Retryable for FeedError {
    fn is_transient(&self) -> bool {
        FeedError::is_transient(self)
    }
}

/// A single package source
///
/// `resolve` returns the descriptor of the hinted version when it is
/// published, otherwise the lowest published version above the hint, with the
/// dependency group nearest to `platform`. `Ok(None)` means the feed has no
/// such version of the id.
pub trait FeedClient: Send + Sync {
    /// Display name, usually the source URL or path
    fn name(&self) -> &str;

    fn resolve(
        &self,
        hint: &PackageIdentity,
        platform: &Framework,
    ) -> impl Future<Output = Result<Option<PackageDescriptor>, FeedError>> + Send;
}

impl<F: FeedClient> FeedClient for Arc<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn resolve(
        &self,
        hint: &PackageIdentity,
        platform: &Framework,
    ) -> impl Future<Output = Result<Option<PackageDescriptor>, FeedError>> + Send {
        (**self).resolve(hint, platform)
    }
}

/// Feed selected from a configuration string
#[derive(Debug)]
pub enum ConfiguredFeed {
    Http(HttpFeed),
    Local(LocalFolderFeed),
}

impl ConfiguredFeed {
    /// `http(s)://` sources become [`HttpFeed`]s, anything else a folder path
    pub fn from_source(source: &str, networking: &NetworkingManager) -> Self {
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Http(HttpFeed::new(source, networking.clone()))
        } else {
            Self::Local(LocalFolderFeed::new(PathBuf::from(source)))
        }
    }
}

impl FeedClient for ConfiguredFeed {
    fn name(&self) -> &str {
        match self {
            Self::Http(feed) => feed.name(),
            Self::Local(feed) => feed.name(),
        }
    }

    async fn resolve(
        &self,
        hint: &PackageIdentity,
        platform: &Framework,
    ) -> Result<Option<PackageDescriptor>, FeedError> {
        match self {
            Self::Http(feed) => feed.resolve(hint, platform).await,
            Self::Local(feed) => feed.resolve(hint, platform).await,
        }
    }
}

/// Pick the entry matching `hint` exactly, else the lowest one above it
///
/// Pre-releases above a release hint are skipped.
pub(crate) fn nearest_at_or_above<'a, T, I>(entries: I, hint: &PackageIdentity) -> Option<T>
where
    I: IntoIterator<Item = (&'a crate::package::PackageVersion, T)>,
{
    entries
        .into_iter()
        .filter(|(version, _)| {
            *version >= hint.version()
                && (!version.is_prerelease()
                    || hint.version().is_prerelease()
                    || *version == hint.version())
        })
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, entry)| entry)
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
