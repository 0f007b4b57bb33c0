//! Fixtures shared by unit and integration tests
//!
//! - [`packages`] - Scratch folders of `.nupkg` / `.nuspec` files
//! - [`mailkit_feed`] - In-memory feed reproducing the MailKit 2.15.0 graph

pub mod packages;

pub use packages::PackageDirFixture;

use crate::feed::InMemoryFeed;
use crate::package::{DependencyEdge, DependencyGroup, Framework, FrameworkFamily};
use crate::package::{PackageIdentity, PackageVersion, VersionRange};

/// Identity built from numeric parts
pub fn identity(id: &str, major: u64, minor: u64, patch: u64) -> PackageIdentity {
    PackageIdentity::new(id, PackageVersion::new(major, minor, patch))
}

/// `id [major.minor.patch, )`
pub fn at_least(id: &str, major: u64, minor: u64, patch: u64) -> DependencyEdge {
    DependencyEdge::new(
        id,
        VersionRange::at_least(PackageVersion::new(major, minor, patch)),
    )
}

pub fn net5() -> Framework {
    Framework::new(FrameworkFamily::Net, 5, 0)
}

/// Rendered tree for MailKit 2.15.0 on net5.0
pub const MAILKIT_TREE: &str = "\
MailKit.2.15.0  {net5.0}
    MimeKit.2.15.0  [2.15.0, )
        System.Security.Cryptography.Pkcs.4.7.0  [4.7.0, )
            System.Security.Cryptography.Cng.4.7.0  [4.7.0, )
        System.Reflection.TypeExtensions.4.4.0  [4.4.0, )
        System.Text.Encoding.CodePages.4.4.0  [4.4.0, )
            Microsoft.NETCore.Platforms.2.0.0  [2.0.0, )
        System.Buffers.4.5.1  [4.5.1, )
        Portable.BouncyCastle.1.8.10  [1.8.10, )
";

/// Resolved set of MailKit 2.15.0 on net5.0, dependencies first
pub const MAILKIT_INSTALL_ORDER: &[&str] = &[
    "Microsoft.NETCore.Platforms.2.0.0",
    "Portable.BouncyCastle.1.8.10",
    "System.Buffers.4.5.1",
    "System.Reflection.TypeExtensions.4.4.0",
    "System.Security.Cryptography.Cng.4.7.0",
    "System.Security.Cryptography.Pkcs.4.7.0 : System.Security.Cryptography.Cng [4.7.0, )",
    "System.Text.Encoding.CodePages.4.4.0 : Microsoft.NETCore.Platforms [2.0.0, )",
    "MimeKit.2.15.0 : System.Security.Cryptography.Pkcs [4.7.0, ), \
System.Reflection.TypeExtensions [4.4.0, ), System.Text.Encoding.CodePages [4.4.0, ), \
System.Buffers [4.5.1, ), Portable.BouncyCastle [1.8.10, )",
    "MailKit.2.15.0 : MimeKit [2.15.0, )",
];

/// Feed publishing the MailKit 2.15.0 graph, plus newer versions that
/// lowest-version resolution must not pick
pub fn mailkit_feed(name: &str) -> InMemoryFeed {
    let netstandard = Framework::new(FrameworkFamily::NetStandard, 2, 0);
    let netframework = Framework::new(FrameworkFamily::NetFramework, 4, 5);

    InMemoryFeed::new(name)
        .with_groups(
            identity("MailKit", 2, 15, 0),
            vec![
                DependencyGroup::new(
                    netframework.clone(),
                    vec![
                        at_least("MimeKit", 2, 15, 0),
                        at_least("System.Net.Http", 4, 3, 4),
                    ],
                ),
                DependencyGroup::new(net5(), vec![at_least("MimeKit", 2, 15, 0)]),
            ],
        )
        .with_groups(
            identity("MimeKit", 2, 15, 0),
            vec![
                DependencyGroup::new(
                    netframework,
                    vec![at_least("Portable.BouncyCastle", 1, 8, 10)],
                ),
                DependencyGroup::new(
                    netstandard,
                    vec![
                        at_least("System.Security.Cryptography.Pkcs", 4, 7, 0),
                        at_least("System.Reflection.TypeExtensions", 4, 4, 0),
                        at_least("System.Text.Encoding.CodePages", 4, 4, 0),
                        at_least("System.Buffers", 4, 5, 1),
                        at_least("Portable.BouncyCastle", 1, 8, 10),
                    ],
                ),
            ],
        )
        .with_package(identity("MimeKit", 3, 0, 0), vec![])
        .with_package(
            identity("System.Security.Cryptography.Pkcs", 4, 7, 0),
            vec![at_least("System.Security.Cryptography.Cng", 4, 7, 0)],
        )
        .with_package(identity("System.Security.Cryptography.Cng", 4, 7, 0), vec![])
        .with_package(identity("System.Security.Cryptography.Cng", 5, 0, 0), vec![])
        .with_package(identity("System.Reflection.TypeExtensions", 4, 4, 0), vec![])
        .with_package(
            identity("System.Text.Encoding.CodePages", 4, 4, 0),
            vec![at_least("Microsoft.NETCore.Platforms", 2, 0, 0)],
        )
        .with_package(identity("Microsoft.NETCore.Platforms", 2, 0, 0), vec![])
        .with_package(identity("Microsoft.NETCore.Platforms", 5, 0, 0), vec![])
        .with_package(identity("System.Buffers", 4, 5, 1), vec![])
        .with_package(identity("Portable.BouncyCastle", 1, 8, 10), vec![])
}
