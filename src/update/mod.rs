// src/update/mod.rs

//! Update orchestration
//!
//! This module is the policy layer of the crate: deciding which packages
//! need action for a given update mode, previewing the action set through
//! the resolver boundary, ordering it, and executing it on a background
//! task while the caller blocks on an ordered completion channel.
//!
//! Submodules follow the pipeline order: `behavior` maps the mode to a
//! dependency behavior, `targets` selects what to act on, `planner` turns
//! targets into action sets, `sequence` orders reinstall phases, `dispatch`
//! runs the pipeline asynchronously, and `engine` ties it all together.

mod behavior;
mod dispatch;
mod engine;
mod planner;
mod sequence;
mod targets;

pub use behavior::dependency_behavior;
pub use dispatch::{CompletionSignal, Dispatcher};
pub use engine::{UpdateEngine, UpdateOptions};
pub use planner::{ActionPlanner, ProjectActionSet};
pub use sequence::{ReinstallPhases, split_reinstall};
pub use targets::{ProjectTargets, TargetSelector};

use crate::error::{Error, Result};
use crate::version::{DependencyBehavior, VersionRequest};
use semver::Version;

/// What one update invocation should do
///
/// Exactly one mode is active per invocation. Construction validates the
/// flag combination once, before any planning starts; every later stage
/// dispatches on the variant instead of re-inspecting flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateMode {
    /// Update every installed package to the highest allowed version
    AllPackages,
    /// Update one package by id
    SingleId(String),
    /// Uninstall then reinstall; `None` means every installed package
    Reinstall(Option<String>),
    /// Patch-level updates only; `None` means every installed package
    Safe(Option<String>),
    /// Move one package to an exact version
    PinnedVersion(String, Version),
    /// Move one package per a relative-version keyword
    RelativeVersion(String, DependencyBehavior),
}

impl UpdateMode {
    /// Derive the mode from raw request flags
    ///
    /// `version` is the raw `--version` token, parsed here so that keyword
    /// and concrete-version requests branch before planning begins.
    pub fn from_request(
        id: Option<String>,
        version: Option<&str>,
        safe: bool,
        reinstall: bool,
    ) -> Result<Self> {
        if safe && reinstall {
            return Err(Error::InvalidRequest(
                "--safe and --reinstall are mutually exclusive".to_string(),
            ));
        }

        if let Some(token) = version {
            let Some(id) = id else {
                return Err(Error::InvalidRequest(
                    "--version requires a package id".to_string(),
                ));
            };
            if safe || reinstall {
                return Err(Error::InvalidRequest(
                    "--version cannot be combined with --safe or --reinstall".to_string(),
                ));
            }
            return Ok(match VersionRequest::parse(token)? {
                VersionRequest::Relative(behavior) => Self::RelativeVersion(id, behavior),
                VersionRequest::Exact(version) => Self::PinnedVersion(id, version),
            });
        }

        Ok(if reinstall {
            Self::Reinstall(id)
        } else if safe {
            Self::Safe(id)
        } else if let Some(id) = id {
            Self::SingleId(id)
        } else {
            Self::AllPackages
        })
    }

    /// The explicitly requested package id, if the mode names one
    pub fn explicit_id(&self) -> Option<&str> {
        match self {
            Self::AllPackages => None,
            Self::SingleId(id) => Some(id),
            Self::Reinstall(id) | Self::Safe(id) => id.as_deref(),
            Self::PinnedVersion(id, _) | Self::RelativeVersion(id, _) => Some(id),
        }
    }

    pub fn is_reinstall(&self) -> bool {
        matches!(self, Self::Reinstall(_))
    }

    /// Whether the mode itself forces prerelease resolution
    ///
    /// Pinning to an explicit prerelease version enables prerelease
    /// selection for the whole invocation, independent of the flag.
    pub fn forces_prerelease(&self) -> bool {
        matches!(self, Self::PinnedVersion(_, version) if !version.pre.is_empty())
    }
}
