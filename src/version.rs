// src/version.rs

//! Version request parsing and dependency behavior policy
//!
//! A version token supplied with an update request is either one of the
//! relative keywords (`highest`, `highest-minor`, `highest-patch`, `lowest`)
//! or a concrete semver version. The two cases drive different planning
//! branches, so parsing produces a tagged result instead of a bare string.

use crate::error::{Error, Result};
use semver::Version;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// How aggressively the resolver may move dependency versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum DependencyBehavior {
    /// Lowest version that satisfies the request
    #[default]
    #[strum(to_string = "lowest")]
    Lowest,
    /// Highest patch within the installed major.minor
    #[strum(to_string = "highest-patch", serialize = "highestpatch")]
    HighestPatch,
    /// Highest minor.patch within the installed major
    #[strum(to_string = "highest-minor", serialize = "highestminor")]
    HighestMinor,
    /// Highest version available
    #[strum(to_string = "highest")]
    Highest,
}

/// A parsed `--version` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    /// One of the relative keywords
    Relative(DependencyBehavior),
    /// A concrete version to pin to
    Exact(Version),
}

impl VersionRequest {
    /// Parse a version token
    ///
    /// Keywords are matched case-insensitively; anything else must parse as
    /// a semver version.
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        if let Ok(behavior) = DependencyBehavior::from_str(token) {
            return Ok(Self::Relative(behavior));
        }
        Version::parse(token)
            .map(Self::Exact)
            .map_err(|_| Error::InvalidVersion(token.to_string()))
    }

    /// Whether this request names a prerelease version
    ///
    /// An explicit prerelease pin force-enables prerelease resolution for
    /// the whole invocation, independent of the prerelease flag.
    pub fn forces_prerelease(&self) -> bool {
        match self {
            Self::Relative(_) => false,
            Self::Exact(version) => !version.pre.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relative_keywords() {
        assert_eq!(
            VersionRequest::parse("highest").unwrap(),
            VersionRequest::Relative(DependencyBehavior::Highest)
        );
        assert_eq!(
            VersionRequest::parse("highest-minor").unwrap(),
            VersionRequest::Relative(DependencyBehavior::HighestMinor)
        );
        assert_eq!(
            VersionRequest::parse("highest-patch").unwrap(),
            VersionRequest::Relative(DependencyBehavior::HighestPatch)
        );
        assert_eq!(
            VersionRequest::parse("lowest").unwrap(),
            VersionRequest::Relative(DependencyBehavior::Lowest)
        );
    }

    #[test]
    fn test_parse_keywords_case_insensitive() {
        assert_eq!(
            VersionRequest::parse("Highest").unwrap(),
            VersionRequest::Relative(DependencyBehavior::Highest)
        );
        assert_eq!(
            VersionRequest::parse("HIGHESTPATCH").unwrap(),
            VersionRequest::Relative(DependencyBehavior::HighestPatch)
        );
        assert_eq!(
            VersionRequest::parse("HighestMinor").unwrap(),
            VersionRequest::Relative(DependencyBehavior::HighestMinor)
        );
    }

    #[test]
    fn test_parse_exact_version() {
        let request = VersionRequest::parse("1.2.3").unwrap();
        assert_eq!(
            request,
            VersionRequest::Exact(Version::parse("1.2.3").unwrap())
        );
        assert!(!request.forces_prerelease());
    }

    #[test]
    fn test_exact_prerelease_forces_prerelease() {
        let request = VersionRequest::parse("2.0.0-beta1").unwrap();
        assert!(request.forces_prerelease());
    }

    #[test]
    fn test_parse_garbage_is_rejected() {
        assert!(matches!(
            VersionRequest::parse("not-a-version"),
            Err(Error::InvalidVersion(_))
        ));
        assert!(matches!(
            VersionRequest::parse(""),
            Err(Error::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_behavior_display_round_trip() {
        for behavior in [
            DependencyBehavior::Lowest,
            DependencyBehavior::HighestPatch,
            DependencyBehavior::HighestMinor,
            DependencyBehavior::Highest,
        ] {
            let text = behavior.to_string();
            assert_eq!(DependencyBehavior::from_str(&text).unwrap(), behavior);
        }
    }
}
