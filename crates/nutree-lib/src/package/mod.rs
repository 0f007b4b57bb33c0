//! # Package Module
//!
//! Domain types shared by discovery, resolution and tree building.
//!
//! ## Modules
//!
//! - [`version`] - NuGet-style versions and version ranges
//! - [`framework`] - Target framework monikers and nearest-group selection
//! - [`identity`] - Case-insensitive package identities
//! - [`descriptor`] - Package descriptors, dependency edges and root sources
//! - [`resolved`] - The one-version-per-id resolved set

pub mod descriptor;
pub mod framework;
pub mod identity;
pub mod resolved;
pub mod version;

pub use descriptor::{DependencyEdge, DependencyGroup, PackageDescriptor, RootSource};
pub use framework::{Framework, FrameworkFamily};
pub use identity::{PackageIdentity, normalize_id};
pub use resolved::ResolvedSet;
pub use version::{PackageVersion, VersionRange};

use thiserror::Error;

/// Errors raised while parsing or assembling package metadata
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Invalid version '{value}': {reason}")]
    InvalidVersion { value: String, reason: String },

    #[error("Invalid version range '{value}': {reason}")]
    InvalidRange { value: String, reason: String },

    #[error("Unsupported target framework: {value}")]
    UnsupportedFramework { value: String },

    #[error("Resolved set already contains an entry for '{id}'")]
    DuplicateResolvedEntry { id: String },

    #[error("Circular dependency detected: {cycle}")]
    CyclicDependency { cycle: String },
}
