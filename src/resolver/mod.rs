// src/resolver/mod.rs

//! External resolver and executor boundary
//!
//! The orchestrator never computes dependency closures or touches installed
//! state itself. It asks an `UpdateResolver` to preview the action set for a
//! requested change, and an `ActionExecutor` to apply a previewed set. Both
//! are supplied by the surrounding package-management subsystem; this crate
//! ships reference implementations over a TOML package index and workspace
//! manifest (see `repository` and `workspace`).

use crate::error::Result;
use crate::identity::{InstalledPackage, PackageIdentity};
use crate::project::Project;
use crate::version::DependencyBehavior;
use async_trait::async_trait;
use semver::Version;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Resolution policy for one invocation
///
/// Constructed fresh per run from the active mode and flags; never mutated
/// after being handed to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionContext {
    /// Dependency-version aggressiveness the resolver should apply
    pub behavior: DependencyBehavior,
    /// Whether prerelease versions may be selected
    pub allow_prerelease: bool,
    /// Whether versions delisted from the source may be selected
    pub include_unlisted: bool,
}

impl ResolutionContext {
    pub fn new(behavior: DependencyBehavior, allow_prerelease: bool) -> Self {
        Self {
            behavior,
            allow_prerelease,
            include_unlisted: false,
        }
    }
}

/// What a planned action does to a package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Install,
    Uninstall,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "install"),
            Self::Uninstall => write!(f, "uninstall"),
        }
    }
}

/// One install or uninstall operation previewed by the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageAction {
    pub kind: ActionKind,
    pub identity: PackageIdentity,
}

impl PackageAction {
    pub fn install(identity: PackageIdentity) -> Self {
        Self {
            kind: ActionKind::Install,
            identity,
        }
    }

    pub fn uninstall(identity: PackageIdentity) -> Self {
        Self {
            kind: ActionKind::Uninstall,
            identity,
        }
    }
}

impl fmt::Display for PackageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.identity)
    }
}

/// A package source the resolver previews against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSource {
    pub name: String,
    pub url: String,
}

impl PackageSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for PackageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// How `find_update` should pick an update candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateRequest {
    /// Pick by behavior window relative to the installed version
    Behavior(DependencyBehavior),
    /// Pick exactly this version, if the source carries it
    Exact(Version),
}

/// Preview boundary of the external package-management subsystem
///
/// Every call may suspend on network or source I/O. A `Resolution` error
/// means no consistent action set exists (conflicting constraints, missing
/// source, transport failure); the orchestrator reports it and does not
/// retry.
#[async_trait]
pub trait UpdateResolver: Send + Sync {
    /// Preview actions to install one concrete identity
    async fn preview_install(
        &self,
        project: &dyn Project,
        identity: &PackageIdentity,
        context: &ResolutionContext,
        source: &PackageSource,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>>;

    /// Preview actions to update a batch of package ids in one resolution
    ///
    /// The batch must be resolved together: moving one id can pin or move
    /// another, so callers pass all ids at once rather than looping.
    async fn preview_update(
        &self,
        project: &dyn Project,
        ids: &[String],
        context: &ResolutionContext,
        source: &PackageSource,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>>;

    /// Preview actions to uninstall and reinstall the given identities
    ///
    /// The result may interleave uninstall and install actions per package;
    /// ordering across phases is the sequencer's job, not the resolver's.
    async fn preview_reinstall(
        &self,
        project: &dyn Project,
        identities: &[PackageIdentity],
        context: &ResolutionContext,
        source: &PackageSource,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>>;

    /// Find the update candidate for one installed reference
    ///
    /// Returns `None` when the source has no version matching the request;
    /// callers treat that as "no update available", not as a failure.
    async fn find_update(
        &self,
        project: &dyn Project,
        installed: &InstalledPackage,
        request: &CandidateRequest,
        context: &ResolutionContext,
        source: &PackageSource,
        cancel: &CancellationToken,
    ) -> Result<Option<PackageIdentity>>;
}

/// Execution boundary of the external package-management subsystem
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Apply a previewed action set to one project
    ///
    /// The token is honored between steps; a step already in flight runs to
    /// completion or failure. Partially-applied sets are not rolled back.
    async fn execute(
        &self,
        project: &dyn Project,
        actions: &[PackageAction],
        cancel: &CancellationToken,
    ) -> Result<()>;
}
