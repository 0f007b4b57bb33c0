//! Command execution handlers
//!
//! Each command resolves its root package, then appends report sections:
//! `retrieve` stops after the root, `transitive` adds the resolved set in
//! dependency order and `tree` adds the rendered dependency tree on top.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::application::cli::{CliConfig, Commands, PackageSelection};
use crate::application::config::AppConfig;
use crate::artifact::LocalArtifactReader;
use crate::feed::{ConfiguredFeed, FeedClient, FeedSession};
use crate::graph::{DependencyWalker, RootRequest};
use crate::networking::NetworkingManager;
use crate::package::{Framework, PackageDescriptor, PackageIdentity, ResolvedSet, RootSource};

const UNDERLINE: &str = "============";

/// Execute CLI commands against the configured feeds
pub async fn execute_command(config: CliConfig) -> Result<()> {
    let command = match config.command {
        Some(cmd) => cmd,
        None => {
            println!("nutree - NuGet dependency summarizer");
            println!("Run 'nutree --help' for usage information");
            return Ok(());
        }
    };

    let walker = build_walker(&config.app_config)?;
    let cancel = CancellationToken::new();
    let interrupt = cancel_on_interrupt(cancel.clone());

    let report = run_command(&command, &walker, &cancel).await;
    interrupt.abort();

    print!("{}", report?);
    Ok(())
}

/// Feed session and walker for the configured feeds
pub fn build_walker(config: &AppConfig) -> Result<DependencyWalker<ConfiguredFeed>> {
    let networking = NetworkingManager::new(config.networking_config())
        .context("Failed to initialize HTTP client")?;

    let feeds: Vec<ConfiguredFeed> = config
        .feeds
        .iter()
        .map(|source| ConfiguredFeed::from_source(source, &networking))
        .collect();
    debug!("Using {} feeds: {}", feeds.len(), config.feeds.join(", "));

    let session = FeedSession::new(feeds)
        .with_retry(config.retry_policy())
        .with_call_timeout(Duration::from_secs(config.net_timeout));

    Ok(DependencyWalker::new(session, config.walker_config()))
}

fn cancel_on_interrupt(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, abandoning feed lookups");
            cancel.cancel();
        }
    })
}

/// Run `command` and return the report to print
pub async fn run_command<F: FeedClient>(
    command: &Commands,
    walker: &DependencyWalker<F>,
    cancel: &CancellationToken,
) -> Result<String> {
    let args = command.package();
    let platform = args.target_framework()?;
    let mut report = String::new();

    let root = match args.selection()? {
        PackageSelection::Identity(identity) => {
            let descriptor = handle_retrieve(walker, &identity, &platform).await?;
            report.push_str(&format!(
                "\nSuccessfully retrieved package: {} {{{}}} from {}\n",
                descriptor.identity(),
                platform,
                origin(&descriptor)
            ));
            RootSource::Feed(Arc::new(descriptor))
        }
        PackageSelection::Artifact(path) => {
            let descriptor = LocalArtifactReader::new()
                .load_root(path.clone(), platform.clone())
                .await
                .with_context(|| format!("Unable to read package: {}", path.display()))?;
            report.push_str(&format!(
                "\nSuccessfully read package: {} {{{}}} from {}\n",
                descriptor.identity(),
                platform,
                path.display()
            ));
            RootSource::LocalArtifact(Arc::new(descriptor))
        }
    };

    if !command.requires_resolution() {
        return Ok(report);
    }

    let resolved = walker
        .resolve(&RootRequest::Source(root), &platform, cancel)
        .await?;
    report.push_str(&section("Transitive Dependencies", &transitive_listing(&resolved)?));

    if let Commands::Tree(_) = command {
        let tree = walker.build_tree(resolved.root(), &resolved)?;
        report.push_str(&section("Dependency Tree", &walker.render(&tree)));
    }

    Ok(report)
}

async fn handle_retrieve<F: FeedClient>(
    walker: &DependencyWalker<F>,
    identity: &PackageIdentity,
    platform: &Framework,
) -> Result<PackageDescriptor> {
    walker
        .retrieve(identity, platform)
        .await?
        .with_context(|| format!("Unable to retrieve package: {} {{{}}}", identity, platform))
}

/// Download location, else the feed that answered
fn origin(descriptor: &PackageDescriptor) -> &str {
    descriptor
        .download_location()
        .or(descriptor.source_feed())
        .unwrap_or("an unnamed feed")
}

/// One summary line per resolved package, dependencies first
pub fn transitive_listing(resolved: &ResolvedSet) -> Result<String> {
    let mut listing = String::new();
    for descriptor in resolved.install_order()? {
        listing.push_str(&descriptor.summary());
        listing.push('\n');
    }
    Ok(listing)
}

fn section(title: &str, body: &str) -> String {
    format!("\n{}\n{}\n{}", title, UNDERLINE, body)
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}
