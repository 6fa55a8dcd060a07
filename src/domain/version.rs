use crate::domain::tag::TagPattern;
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Magnitude of a version change.
///
/// Variants are declared in ascending order so the derived `Ord` gives
/// `Patch < Minor < Major`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    #[default]
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Increment a semantic version string by the given bump.
///
/// Lower components are zeroed and any pre-release or build metadata is
/// dropped. Fails when `version` is not a valid semantic version.
pub fn increment(version: &str, bump: VersionBump) -> Result<String> {
    let mut parsed = semver::Version::parse(version).map_err(|e| {
        ReleaseError::version(format!("'{}' is not a semantic version: {}", version, e))
    })?;

    match bump {
        VersionBump::Major => {
            parsed.major += 1;
            parsed.minor = 0;
            parsed.patch = 0;
        }
        VersionBump::Minor => {
            parsed.minor += 1;
            parsed.patch = 0;
        }
        VersionBump::Patch => {
            parsed.patch += 1;
        }
    }
    parsed.pre = semver::Prerelease::EMPTY;
    parsed.build = semver::BuildMetadata::EMPTY;

    Ok(parsed.to_string())
}

/// Compute the next release tag.
///
/// With a prior tag, the version part is extracted through `pattern` and
/// incremented by `bump`. Without one (first release ever), the result is
/// `initial_version` formatted through `pattern`, independent of `bump`.
pub fn next_version(
    prior_tag: Option<&str>,
    bump: VersionBump,
    pattern: &TagPattern,
    initial_version: &str,
) -> Result<String> {
    match prior_tag {
        Some(tag) => {
            let current = pattern.extract_version(tag).ok_or_else(|| {
                ReleaseError::version(format!(
                    "Tag '{}' does not match pattern '{}'",
                    tag, pattern.pattern
                ))
            })?;
            let next = increment(&current, bump)?;
            Ok(pattern.format(&next))
        }
        None => {
            semver::Version::parse(initial_version).map_err(|e| {
                ReleaseError::config(format!(
                    "initial_version '{}' is not a semantic version: {}",
                    initial_version, e
                ))
            })?;
            Ok(pattern.format(initial_version))
        }
    }
}
