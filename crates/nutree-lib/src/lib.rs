//! # nutree Library
//!
//! NuGet dependency discovery, resolution and tree rendering.
//!
//! ## Core Modules
//!
//! - [`package`] - Versions, ranges, frameworks, identities and descriptors
//! - [`feed`] - Package sources: NuGet V3 HTTP, local folders, in-memory
//! - [`artifact`] - Reading `.nupkg` / `.nuspec` files
//! - [`graph`] - Discovery, resolution and dependency trees
//! - [`networking`] - Shared HTTP client, concurrency limit and retry policy
//! - [`logger`] - Structured logging with progress tracking
//! - [`primitives`] - Shared configuration types and errors
//! - [`application`] - CLI interface and configuration management
//! - [`testing`] - Fixtures for unit and integration tests
//!
//! ## Quick Start
//!
//! ```no_run
//! use nutree_lib::feed::{ConfiguredFeed, FeedSession};
//! use nutree_lib::graph::{DependencyWalker, RootRequest, WalkerConfig};
//! use nutree_lib::networking::{NetworkingConfig, NetworkingManager};
//! use nutree_lib::package::{Framework, PackageIdentity};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let networking = NetworkingManager::new(NetworkingConfig::default())?;
//! let feed = ConfiguredFeed::from_source("https://api.nuget.org/v3/index.json", &networking);
//! let walker = DependencyWalker::new(FeedSession::new(vec![feed]), WalkerConfig::default());
//!
//! let root = RootRequest::Identity(PackageIdentity::new("MailKit", "2.15.0".parse()?));
//! let tree = walker
//!     .tree(&root, &"net5.0".parse::<Framework>()?, &CancellationToken::new())
//!     .await?;
//! print!("{}", walker.render(&tree));
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod artifact;
pub mod feed;
pub mod graph;
pub mod logger;
pub mod networking;
pub mod package;
pub mod primitives;
pub mod testing;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use graph::{DependencyTree, DependencyWalker, WalkError};
pub use logger::Logger;
pub use networking::{NetworkingConfig, NetworkingManager};
pub use package::{Framework, PackageDescriptor, PackageIdentity, PackageVersion, ResolvedSet};
pub use primitives::{ColorChoice, ConfigError, LogFormat, LogLevel, LogOutput, LoggerError};

// Private imports for the main function
use anyhow::Result;
use application::CliConfig;

pub async fn main() -> Result<()> {
    // Load configuration: defaults -> .env -> env vars -> CLI
    let config = CliConfig::load()?;

    Logger::init(config.app_config.to_logger_config())?;
    AppConfig::init_global(config.app_config.clone())?;

    // Execute the command
    execute_command(config).await
}
