use crate::package::{Framework, PackageIdentity, PackageVersion};
use crate::primitives::ConfigError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::config::AppConfig;

/// nutree CLI - NuGet dependency summarizer
#[derive(Debug, Clone, Parser)]
#[command(name = "nutree")]
#[command(about = "Resolve and display the transitive dependencies of a NuGet package")]
#[command(version)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// nutree commands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration loaded from CLI
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

impl CliConfig {
    /// Load configuration from `.env` files, the environment and command line arguments
    pub fn load() -> Result<Self, ConfigError> {
        // .env values must be visible before clap reads NUTREE_* variables
        AppConfig::load_env_files()?;
        Self::from_cli(Cli::parse())
    }

    /// Layer already-parsed arguments over defaults and standard env vars
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        Ok(Self {
            app_config: AppConfig::layered(cli.config)?,
            command: cli.command,
        })
    }
}

/// Available nutree commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Retrieve a package from the first feed that has it
    Retrieve(PackageArgs),

    /// List the resolved transitive dependencies, dependencies first
    Transitive(PackageArgs),

    /// Display the resolved dependency tree
    Tree(PackageArgs),
}

impl Commands {
    pub fn package(&self) -> &PackageArgs {
        match self {
            Commands::Retrieve(args) | Commands::Transitive(args) | Commands::Tree(args) => args,
        }
    }

    /// Whether the command needs the resolved dependency graph
    pub fn requires_resolution(&self) -> bool {
        !matches!(self, Commands::Retrieve(_))
    }
}

/// Package selection shared by every command
#[derive(Debug, Clone, Args)]
pub struct PackageArgs {
    /// NuGet package ID (e.g. MailKit)
    #[arg(long)]
    pub id: Option<String>,

    /// NuGet package version (e.g. 2.15.0)
    #[arg(long = "version", value_name = "VERSION")]
    pub package_version: Option<String>,

    /// NuGet package file path (e.g. ./MyPackage.1.0.0.nupkg)
    #[arg(long, value_name = "PATH")]
    pub nupkg: Option<PathBuf>,

    /// Target framework (e.g. net5.0)
    #[arg(short, long)]
    pub framework: String,
}

/// Where the root package comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSelection {
    /// Looked up on the configured feeds
    Identity(PackageIdentity),
    /// Read from a local `.nupkg` or `.nuspec`
    Artifact(PathBuf),
}

impl PackageArgs {
    /// Exactly one of `--nupkg` or `--id` with `--version`
    pub fn selection(&self) -> Result<PackageSelection, ConfigError> {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());

        match (&self.nupkg, present(&self.id), present(&self.package_version)) {
            (None, true, true) => {
                let id = self.id.as_deref().unwrap_or_default().trim();
                let raw_version = self.package_version.as_deref().unwrap_or_default().trim();
                let version: PackageVersion =
                    raw_version.parse().map_err(|e: crate::package::PackageError| {
                        ConfigError::ParseError {
                            value: raw_version.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                Ok(PackageSelection::Identity(PackageIdentity::new(id, version)))
            }
            (Some(path), false, false) => Ok(PackageSelection::Artifact(path.clone())),
            _ => Err(ConfigError::ValidationFailed {
                reason: "Must either specify the path to a nupkg file or provide the ID and \
                         Version of a package to retrieve from a feed, but not both"
                    .to_string(),
            }),
        }
    }

    pub fn target_framework(&self) -> Result<Framework, ConfigError> {
        self.framework
            .parse()
            .map_err(|e: crate::package::PackageError| ConfigError::ParseError {
                value: self.framework.clone(),
                reason: e.to_string(),
            })
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            command: None,
        }
    }
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
