//! Ordered feed list shared by one resolution session

use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::{FeedClient, FeedError};
use crate::networking::RetryPolicy;
use crate::package::{Framework, PackageDescriptor, PackageIdentity};

/// Default upper bound for a single feed call, retries excluded
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Feeds queried in configuration order, each call bounded by a timeout and
/// retried on transient failure
#[derive(Debug)]
pub struct FeedSession<F> {
    feeds: Vec<F>,
    retry: RetryPolicy,
    call_timeout: Duration,
}

impl<F: FeedClient> FeedSession<F> {
    pub fn new(feeds: Vec<F>) -> Self {
        Self {
            feeds,
            retry: RetryPolicy::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn feeds(&self) -> &[F] {
        &self.feeds
    }

    async fn resolve_on(
        &self,
        feed: &F,
        hint: &PackageIdentity,
        platform: &Framework,
    ) -> Result<Option<PackageDescriptor>, FeedError> {
        let label = format!("{} lookup of {}", feed.name(), hint);

        let found = self
            .retry
            .run(&label, || async {
                match tokio::time::timeout(self.call_timeout, feed.resolve(hint, platform)).await {
                    Ok(result) => result,
                    Err(_) => Err(FeedError::Timeout {
                        feed: feed.name().to_string(),
                        after: self.call_timeout,
                    }),
                }
            })
            .await?;

        Ok(found.map(|descriptor| match descriptor.source_feed() {
            Some(_) => descriptor,
            None => descriptor.with_source_feed(feed.name()),
        }))
    }

    /// First feed (in configuration order) that knows the package wins
    ///
    /// Feeds that stay unavailable after retries are skipped; their last
    /// error is returned only if no other feed had the package.
    pub async fn resolve_first(
        &self,
        hint: &PackageIdentity,
        platform: &Framework,
    ) -> Result<Option<PackageDescriptor>, FeedError> {
        self.first_accepted(hint, platform, |_| true).await
    }

    /// First feed publishing exactly `identity`
    ///
    /// A feed answering with a nearby version is passed over, so a later
    /// feed holding the exact version still wins.
    pub async fn resolve_exact(
        &self,
        identity: &PackageIdentity,
        platform: &Framework,
    ) -> Result<Option<PackageDescriptor>, FeedError> {
        self.first_accepted(identity, platform, |descriptor| {
            descriptor.identity() == identity
        })
        .await
    }

    async fn first_accepted(
        &self,
        hint: &PackageIdentity,
        platform: &Framework,
        accept: impl Fn(&PackageDescriptor) -> bool,
    ) -> Result<Option<PackageDescriptor>, FeedError> {
        let mut last_transient = None;

        for feed in &self.feeds {
            match self.resolve_on(feed, hint, platform).await {
                Ok(Some(descriptor)) if accept(&descriptor) => {
                    debug!("Found {} on {}", descriptor, feed.name());
                    return Ok(Some(descriptor));
                }
                Ok(Some(descriptor)) => {
                    debug!("{} offered {} for {}, skipping", feed.name(), descriptor, hint)
                }
                Ok(None) => trace!("{} not found on {}", hint, feed.name()),
                Err(e) if e.is_transient() => {
                    warn!("Skipping feed {} for {}: {}", feed.name(), hint, e);
                    last_transient = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        match last_transient {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    /// Union of every feed's answer, deduplicated by identity
    ///
    /// Feeds are queried concurrently; when two feeds return the same
    /// identity the earlier feed in configuration order wins.
    pub async fn resolve_all(
        &self,
        hint: &PackageIdentity,
        platform: &Framework,
    ) -> Result<Vec<PackageDescriptor>, FeedError> {
        let answers = join_all(
            self.feeds
                .iter()
                .map(|feed| self.resolve_on(feed, hint, platform)),
        )
        .await;

        let mut found: Vec<PackageDescriptor> = Vec::new();
        let mut last_transient = None;

        for (feed, answer) in self.feeds.iter().zip(answers) {
            match answer {
                Ok(Some(descriptor)) => {
                    if found
                        .iter()
                        .any(|known| known.identity() == descriptor.identity())
                    {
                        trace!("{} already found on an earlier feed", descriptor);
                    } else {
                        found.push(descriptor);
                    }
                }
                Ok(None) => trace!("{} not found on {}", hint, feed.name()),
                Err(e) if e.is_transient() => {
                    warn!("Skipping feed {} for {}: {}", feed.name(), hint, e);
                    last_transient = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        match last_transient {
            Some(e) if found.is_empty() => Err(e),
            _ => Ok(found),
        }
    }
}

#[cfg(test)]
mod tests {
    include!("session.test.rs");
}
