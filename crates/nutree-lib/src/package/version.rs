//! NuGet-style versions and version ranges
//!
//! Versions carry up to four numeric parts (`major.minor.patch.revision`) plus
//! an optional pre-release label. The first three parts and the label are held
//! in a [`semver::Version`]; the revision rides alongside it.

use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::PackageError;

/// A package version such as `2.15.0`, `4.0.0.1` or `1.0.0-beta.2`
#[derive(Debug, Clone)]
pub struct PackageVersion {
    version: Version,
    revision: u64,
    /// Lowercased label; NuGet orders labels ignoring case
    pre_key: Prerelease,
}

impl PackageVersion {
    /// Create a release version from its numeric parts
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            version: Version::new(major, minor, patch),
            revision: 0,
            pre_key: Prerelease::EMPTY,
        }
    }

    /// The lowest possible release version, `0.0.0`
    pub fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Set the fourth numeric part
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Pre-release label without the leading `-` (empty for releases)
    pub fn prerelease(&self) -> &str {
        self.version.pre.as_str()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }

    /// Smallest version ordered after this pre-release: `1.0.0-beta` -> `1.0.0-beta.0`
    ///
    /// `None` for releases, whose successor depends on the revision instead.
    pub fn next_prerelease(&self) -> Option<Self> {
        if !self.is_prerelease() {
            return None;
        }
        let mut next = self.clone();
        next.set_prerelease(&format!("{}.0", self.version.pre)).ok()?;
        Some(next)
    }

    fn set_prerelease(&mut self, label: &str) -> Result<(), semver::Error> {
        self.version.pre = Prerelease::new(label)?;
        self.pre_key = Prerelease::new(&label.to_ascii_lowercase())?;
        Ok(())
    }

    fn sort_key(&self) -> (u64, u64, u64, u64) {
        (
            self.version.major,
            self.version.minor,
            self.version.patch,
            self.revision,
        )
    }
}

impl FromStr for PackageVersion {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| PackageError::InvalidVersion {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid("version is empty"));
        }

        let (without_build, build) = match trimmed.split_once('+') {
            Some((head, meta)) => (head, Some(meta)),
            None => (trimmed, None),
        };
        let (numbers, pre) = match without_build.split_once('-') {
            Some((head, label)) => (head, Some(label)),
            None => (without_build, None),
        };

        let parts = numbers
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| invalid("numeric parts must be unsigned integers"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if parts.is_empty() || parts.len() > 4 {
            return Err(invalid("expected between one and four numeric parts"));
        }

        let part = |index: usize| parts.get(index).copied().unwrap_or(0);
        let mut parsed = Self::new(part(0), part(1), part(2)).with_revision(part(3));

        if let Some(label) = pre {
            parsed
                .set_prerelease(label)
                .map_err(|e| invalid(&e.to_string()))?;
        }
        if let Some(meta) = build {
            parsed.version.build =
                BuildMetadata::new(meta).map_err(|e| invalid(&e.to_string()))?;
        }

        Ok(parsed)
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.version.major, self.version.minor, self.version.patch
        )?;
        if self.revision > 0 {
            write!(f, ".{}", self.revision)?;
        }
        if !self.version.pre.is_empty() {
            write!(f, "-{}", self.version.pre)?;
        }
        Ok(())
    }
}

// Build metadata and label casing never participate in equality or ordering.
impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackageVersion {}

impl Hash for PackageVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
        self.pre_key.as_str().hash(state);
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.pre_key.cmp(&other.pre_key))
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Interval of acceptable versions attached to a dependency edge
///
/// Parses and prints NuGet interval notation:
///
/// | input          | meaning                 | display              |
/// |----------------|-------------------------|----------------------|
/// | `1.0`          | `1.0.0 <= v`            | `[1.0.0, )`          |
/// | `[1.0]`        | `v == 1.0.0`            | `[1.0.0]`            |
/// | `(1.0, 2.0]`   | `1.0.0 < v <= 2.0.0`    | `(1.0.0, 2.0.0]`     |
/// | `(, 2.0)`      | `v < 2.0.0`             | `(, 2.0.0)`          |
/// | `*` or empty   | any version             | `(, )`               |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRange {
    min: Option<PackageVersion>,
    min_inclusive: bool,
    max: Option<PackageVersion>,
    max_inclusive: bool,
}

impl VersionRange {
    /// Range accepting every version
    pub fn all() -> Self {
        Self {
            min: None,
            min_inclusive: false,
            max: None,
            max_inclusive: false,
        }
    }

    /// `[min, )`
    pub fn at_least(min: PackageVersion) -> Self {
        Self {
            min: Some(min),
            min_inclusive: true,
            max: None,
            max_inclusive: false,
        }
    }

    /// `[version]`
    pub fn exact(version: PackageVersion) -> Self {
        Self {
            min: Some(version.clone()),
            min_inclusive: true,
            max: Some(version),
            max_inclusive: true,
        }
    }

    /// Arbitrary interval; bounds are validated so the range is never empty
    pub fn between(
        min: Option<PackageVersion>,
        min_inclusive: bool,
        max: Option<PackageVersion>,
        max_inclusive: bool,
    ) -> Result<Self, PackageError> {
        let range = Self {
            min_inclusive: min_inclusive && min.is_some(),
            max_inclusive: max_inclusive && max.is_some(),
            min,
            max,
        };
        range.validate()?;
        Ok(range)
    }

    fn validate(&self) -> Result<(), PackageError> {
        if let (Some(min), Some(max)) = (&self.min, &self.max) {
            let empty = match min.cmp(max) {
                Ordering::Greater => true,
                Ordering::Equal => !(self.min_inclusive && self.max_inclusive),
                Ordering::Less => false,
            };
            if empty {
                return Err(PackageError::InvalidRange {
                    value: self.to_string(),
                    reason: "range does not contain any version".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Lower bound, used as the version hint when fetching metadata
    pub fn min_version(&self) -> Option<&PackageVersion> {
        self.min.as_ref()
    }

    pub fn max_version(&self) -> Option<&PackageVersion> {
        self.max.as_ref()
    }

    pub fn is_min_inclusive(&self) -> bool {
        self.min_inclusive
    }

    pub fn is_max_inclusive(&self) -> bool {
        self.max_inclusive
    }

    /// Check whether `version` lies inside the interval
    pub fn satisfies(&self, version: &PackageVersion) -> bool {
        let above_min = match &self.min {
            Some(min) if self.min_inclusive => version >= min,
            Some(min) => version > min,
            None => true,
        };
        let below_max = match &self.max {
            Some(max) if self.max_inclusive => version <= max,
            Some(max) => version < max,
            None => true,
        };
        above_min && below_max
    }

    fn is_exact(&self) -> bool {
        self.min_inclusive && self.max_inclusive && self.min.is_some() && self.min == self.max
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for VersionRange {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| PackageError::InvalidRange {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Self::all());
        }

        let min_inclusive = match trimmed.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => return Ok(Self::at_least(trimmed.parse()?)),
        };
        let max_inclusive = match trimmed.chars().last() {
            Some(']') => true,
            Some(')') => false,
            _ => return Err(invalid("missing closing bracket")),
        };

        let inner = &trimmed[1..trimmed.len() - 1];
        let parse_bound = |text: &str| -> Result<Option<PackageVersion>, PackageError> {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some)
            }
        };

        match inner.split_once(',') {
            Some((low, high)) => Self::between(
                parse_bound(low)?,
                min_inclusive,
                parse_bound(high)?,
                max_inclusive,
            ),
            None if min_inclusive && max_inclusive => {
                let version = parse_bound(inner)?.ok_or_else(|| invalid("empty exact range"))?;
                Ok(Self::exact(version))
            }
            None => Err(invalid("single-version ranges must use square brackets")),
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exact() {
            if let Some(version) = &self.min {
                return write!(f, "[{}]", version);
            }
        }

        let open = if self.min_inclusive { '[' } else { '(' };
        let close = if self.max_inclusive { ']' } else { ')' };
        let min = self.min.as_ref().map(ToString::to_string).unwrap_or_default();
        let max = self.max.as_ref().map(ToString::to_string).unwrap_or_default();

        write!(f, "{}{}, {}{}", open, min, max, close)
    }
}

#[cfg(test)]
mod tests {
    include!("version.test.rs");
}
