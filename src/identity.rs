// src/identity.rs

//! Package identities and installed references
//!
//! A `PackageIdentity` names one concrete (id, version) pair. Identifiers
//! compare case-insensitively, matching how package sources treat them;
//! versions compare by semver order.

use semver::Version;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A concrete package: identifier plus exact version
#[derive(Debug, Clone)]
pub struct PackageIdentity {
    pub id: String,
    pub version: Version,
}

impl PackageIdentity {
    pub fn new(id: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }

    /// Case-insensitive identifier match
    pub fn matches_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }
}

impl PartialEq for PackageIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id.eq_ignore_ascii_case(&other.id) && self.version == other.version
    }
}

impl Eq for PackageIdentity {}

impl Hash for PackageIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.id.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        self.version.hash(state);
    }
}

impl Ord for PackageIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.id.bytes().map(|b| b.to_ascii_lowercase());
        let rhs = other.id.bytes().map(|b| b.to_ascii_lowercase());
        lhs.cmp(rhs).then_with(|| self.version.cmp(&other.version))
    }
}

impl PartialOrd for PackageIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

/// An installed occurrence of a package within one project
///
/// Produced by the project store boundary; read-only to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub identity: PackageIdentity,
}

impl InstalledPackage {
    pub fn new(identity: PackageIdentity) -> Self {
        Self { identity }
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn version(&self) -> &Version {
        &self.identity.version
    }
}

impl fmt::Display for InstalledPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)
    }
}
