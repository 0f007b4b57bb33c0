use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::PackageVersion;

/// Lowercase form used for map keys and case-insensitive comparison
pub fn normalize_id(id: &str) -> String {
    id.to_ascii_lowercase()
}

/// Package id plus exact version
///
/// Ids compare case-insensitively, but the original casing is kept for
/// display (`MailKit.2.15.0`).
#[derive(Debug, Clone)]
pub struct PackageIdentity {
    id: String,
    version: PackageVersion,
}

impl PackageIdentity {
    pub fn new(id: impl Into<String>, version: PackageVersion) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &PackageVersion {
        &self.version
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }

    pub fn normalized_id(&self) -> String {
        normalize_id(&self.id)
    }

    fn cmp_id(&self, other: &Self) -> Ordering {
        self.id
            .bytes()
            .map(|b| b.to_ascii_lowercase())
            .cmp(other.id.bytes().map(|b| b.to_ascii_lowercase()))
    }
}

impl PartialEq for PackageIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.has_id(&other.id) && self.version == other.version
    }
}

impl Eq for PackageIdentity {}

impl Hash for PackageIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.id.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
        self.version.hash(state);
    }
}

impl Ord for PackageIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_id(other)
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl PartialOrd for PackageIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id, self.version)
    }
}

#[cfg(test)]
mod tests {
    include!("identity.test.rs");
}
