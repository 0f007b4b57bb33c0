//! Target framework monikers
//!
//! Accepts the short folder names used in nuspec files and on the command
//! line (`net5.0`, `netstandard2.0`, `net461`) as well as the long
//! identifiers (`.NETStandard2.0`, `.NETCoreApp,Version=v3.1`). Only the
//! families needed to select dependency groups for modern .NET projects are
//! modelled.

use std::fmt;
use std::str::FromStr;

use super::PackageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameworkFamily {
    /// Group without a target framework, compatible with everything
    Any,
    /// `net5.0` and later
    Net,
    NetCoreApp,
    NetStandard,
    /// Classic `.NETFramework` (`net45`, `net461`, ...)
    NetFramework,
}

impl FrameworkFamily {
    fn short_name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Net => "net",
            Self::NetCoreApp => "netcoreapp",
            Self::NetStandard => "netstandard",
            Self::NetFramework => "net",
        }
    }
}

/// A target framework such as `net5.0` or `netstandard2.0`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Framework {
    family: FrameworkFamily,
    version: (u32, u32, u32),
    platform: Option<String>,
}

impl Framework {
    pub fn new(family: FrameworkFamily, major: u32, minor: u32) -> Self {
        Self {
            family,
            version: (major, minor, 0),
            platform: None,
        }
    }

    pub fn any() -> Self {
        Self {
            family: FrameworkFamily::Any,
            version: (0, 0, 0),
            platform: None,
        }
    }

    pub fn with_patch(mut self, patch: u32) -> Self {
        self.version.2 = patch;
        self
    }

    /// Attach an OS platform suffix (`net5.0-windows`)
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into().to_ascii_lowercase());
        self
    }

    pub fn family(&self) -> FrameworkFamily {
        self.family
    }

    pub fn version(&self) -> (u32, u32, u32) {
        self.version
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn is_any(&self) -> bool {
        self.family == FrameworkFamily::Any
    }

    /// Highest `netstandard` version a project targeting `self` can consume
    fn max_netstandard(&self) -> Option<(u32, u32, u32)> {
        let (major, minor, patch) = self.version;
        match self.family {
            FrameworkFamily::Net => Some((2, 1, 0)),
            FrameworkFamily::NetStandard => Some(self.version),
            FrameworkFamily::NetCoreApp if major >= 3 => Some((2, 1, 0)),
            FrameworkFamily::NetCoreApp if major == 2 => Some((2, 0, 0)),
            FrameworkFamily::NetCoreApp => Some((1, 6, 0)),
            FrameworkFamily::NetFramework => match (major, minor, patch) {
                v if v >= (4, 6, 1) => Some((2, 0, 0)),
                v if v >= (4, 6, 0) => Some((1, 3, 0)),
                v if v >= (4, 5, 2) => Some((1, 2, 0)),
                v if v >= (4, 5, 0) => Some((1, 1, 0)),
                _ => None,
            },
            FrameworkFamily::Any => None,
        }
    }

    /// Whether assets built for `self` can be consumed by a `target` project
    pub fn is_compatible_with(&self, target: &Framework) -> bool {
        if let Some(platform) = &self.platform {
            if target.platform.as_ref() != Some(platform) {
                return false;
            }
        }

        match (self.family, target.family) {
            (FrameworkFamily::Any, _) => true,
            (group, project) if group == project => self.version <= target.version,
            (FrameworkFamily::NetCoreApp, FrameworkFamily::Net) => self.version <= target.version,
            (FrameworkFamily::NetStandard, _) => target
                .max_netstandard()
                .is_some_and(|max| self.version <= max),
            _ => false,
        }
    }

    fn affinity(&self, target: &Framework) -> u8 {
        match (self.family, target.family) {
            (group, project) if group == project => 3,
            (FrameworkFamily::NetCoreApp, FrameworkFamily::Net) => 2,
            (FrameworkFamily::NetStandard, _) => 1,
            _ => 0,
        }
    }

    /// Pick the candidate closest to `self` among those it is compatible with
    ///
    /// Same-family groups win over `netcoreapp`, which wins over
    /// `netstandard`, which wins over the framework-less group; ties go to
    /// the highest version and then to platform-specific groups.
    pub fn nearest<'a, I>(&self, candidates: I) -> Option<&'a Framework>
    where
        I: IntoIterator<Item = &'a Framework>,
    {
        candidates
            .into_iter()
            .filter(|candidate| candidate.is_compatible_with(self))
            .max_by_key(|candidate| {
                (
                    candidate.affinity(self),
                    candidate.version,
                    candidate.platform.is_some(),
                )
            })
    }
}

impl Default for Framework {
    fn default() -> Self {
        Self::any()
    }
}

fn parse_dotted(text: &str) -> Option<(u32, u32, u32)> {
    let parts = text
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() || parts.len() > 4 {
        return None;
    }
    let part = |index: usize| parts.get(index).copied().unwrap_or(0);
    Some((part(0), part(1), part(2)))
}

/// `461` -> 4.6.1, `45` -> 4.5.0
fn parse_compact(text: &str) -> Option<(u32, u32, u32)> {
    if text.is_empty() || text.len() > 3 || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let digit = |index: usize| {
        text.as_bytes()
            .get(index)
            .map(|b| u32::from(b - b'0'))
            .unwrap_or(0)
    };
    Some((digit(0), digit(1), digit(2)))
}

impl FromStr for Framework {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || PackageError::UnsupportedFramework {
            value: s.to_string(),
        };

        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.is_empty() || lower == "any" || lower == "agnostic" {
            return Ok(Self::any());
        }

        // Long form: ".NETStandard,Version=v2.0" or ".NETStandard2.0"
        let lower = lower.replace(",version=v", "");
        let lower = match lower.split_once(",profile=") {
            Some((head, _)) => head.to_string(),
            None => lower,
        };

        let (moniker, platform) = match lower.split_once('-') {
            Some((head, platform)) if !platform.is_empty() => (head, Some(platform)),
            _ => (lower.as_str(), None),
        };

        let prefixes = [
            (".netstandard", FrameworkFamily::NetStandard),
            ("netstandard", FrameworkFamily::NetStandard),
            (".netcoreapp", FrameworkFamily::NetCoreApp),
            ("netcoreapp", FrameworkFamily::NetCoreApp),
            (".netframework", FrameworkFamily::NetFramework),
            ("net", FrameworkFamily::Net),
        ];

        let (family, rest) = prefixes
            .iter()
            .find_map(|(prefix, family)| moniker.strip_prefix(prefix).map(|rest| (*family, rest)))
            .ok_or_else(unsupported)?;

        let (family, version) = match family {
            FrameworkFamily::Net if !rest.contains('.') => {
                (FrameworkFamily::NetFramework, parse_compact(rest))
            }
            FrameworkFamily::Net => {
                let version = parse_dotted(rest);
                match version {
                    Some(v) if v.0 >= 5 => (FrameworkFamily::Net, version),
                    _ => (FrameworkFamily::NetFramework, version),
                }
            }
            FrameworkFamily::NetFramework if !rest.contains('.') => (family, parse_compact(rest)),
            _ => (family, parse_dotted(rest)),
        };

        let version = version.ok_or_else(unsupported)?;
        if platform.is_some() && family != FrameworkFamily::Net {
            return Err(unsupported());
        }

        Ok(Self {
            family,
            version,
            platform: platform.map(str::to_string),
        })
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, minor, patch) = self.version;
        match self.family {
            FrameworkFamily::Any => write!(f, "{}", self.family.short_name()),
            FrameworkFamily::NetFramework => {
                write!(f, "{}{}{}", self.family.short_name(), major, minor)?;
                if patch > 0 {
                    write!(f, "{}", patch)?;
                }
                Ok(())
            }
            _ => {
                write!(f, "{}{}.{}", self.family.short_name(), major, minor)?;
                if patch > 0 {
                    write!(f, ".{}", patch)?;
                }
                if let Some(platform) = &self.platform {
                    write!(f, "-{}", platform)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    include!("framework.test.rs");
}
