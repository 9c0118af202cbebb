// src/update/targets.rs

//! Per-project update target selection
//!
//! Decides, for one project and the active mode, what the planner should
//! preview: a batched id list, a reinstall identity list, or concrete
//! install candidates. Single-id modes resolve the user-supplied id against
//! the installed set case-insensitively and carry the installed casing
//! forward.

use super::UpdateMode;
use crate::error::Result;
use crate::identity::{InstalledPackage, PackageIdentity};
use crate::project::Project;
use crate::resolver::{CandidateRequest, PackageSource, ResolutionContext, UpdateResolver};
use crate::version::DependencyBehavior;
use semver::Version;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What the planner should preview for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectTargets {
    /// Package ids to update in one batched resolution
    Batch(Vec<String>),
    /// Installed identities to uninstall and reinstall
    Reinstall(Vec<PackageIdentity>),
    /// Concrete update candidates to preview-install one at a time
    Candidates(Vec<PackageIdentity>),
    /// The explicitly requested id is not installed in this project
    NotInstalled,
    /// The project has no installed packages to act on
    Empty,
}

/// Selects update targets for one project at a time
pub struct TargetSelector<'a> {
    resolver: &'a dyn UpdateResolver,
    context: &'a ResolutionContext,
    source: &'a PackageSource,
}

impl<'a> TargetSelector<'a> {
    pub fn new(
        resolver: &'a dyn UpdateResolver,
        context: &'a ResolutionContext,
        source: &'a PackageSource,
    ) -> Self {
        Self {
            resolver,
            context,
            source,
        }
    }

    /// Enumerate targets for `project` under `mode`
    pub async fn select(
        &self,
        project: &dyn Project,
        mode: &UpdateMode,
        cancel: &CancellationToken,
    ) -> Result<ProjectTargets> {
        let installed = project.installed_packages(cancel).await?;
        debug!(
            "project '{}': {} installed package(s)",
            project.name(),
            installed.len()
        );

        match mode {
            UpdateMode::AllPackages => {
                if installed.is_empty() {
                    return Ok(ProjectTargets::Empty);
                }
                let ids = installed.iter().map(|p| p.id().to_string()).collect();
                Ok(ProjectTargets::Batch(ids))
            }
            UpdateMode::SingleId(id) => {
                let Some(reference) = find_installed(&installed, id) else {
                    return Ok(ProjectTargets::NotInstalled);
                };
                Ok(ProjectTargets::Batch(vec![reference.id().to_string()]))
            }
            UpdateMode::Reinstall(None) => {
                if installed.is_empty() {
                    return Ok(ProjectTargets::Empty);
                }
                let identities = installed.iter().map(|p| p.identity.clone()).collect();
                Ok(ProjectTargets::Reinstall(identities))
            }
            UpdateMode::Reinstall(Some(id)) => {
                let Some(reference) = find_installed(&installed, id) else {
                    return Ok(ProjectTargets::NotInstalled);
                };
                Ok(ProjectTargets::Reinstall(vec![reference.identity.clone()]))
            }
            UpdateMode::Safe(None) => {
                if installed.is_empty() {
                    return Ok(ProjectTargets::Empty);
                }
                let mut candidates = Vec::new();
                for reference in &installed {
                    if let Some(candidate) = self.safe_candidate(project, reference, cancel).await?
                    {
                        candidates.push(candidate);
                    }
                }
                Ok(ProjectTargets::Candidates(candidates))
            }
            UpdateMode::Safe(Some(id)) => {
                let Some(reference) = find_installed(&installed, id) else {
                    return Ok(ProjectTargets::NotInstalled);
                };
                let candidates = self
                    .safe_candidate(project, reference, cancel)
                    .await?
                    .into_iter()
                    .collect();
                Ok(ProjectTargets::Candidates(candidates))
            }
            UpdateMode::PinnedVersion(id, version) => {
                let Some(reference) = find_installed(&installed, id) else {
                    return Ok(ProjectTargets::NotInstalled);
                };
                let request = CandidateRequest::Exact(version.clone());
                let candidates = self
                    .resolver
                    .find_update(project, reference, &request, self.context, self.source, cancel)
                    .await?
                    .into_iter()
                    .collect();
                Ok(ProjectTargets::Candidates(candidates))
            }
            UpdateMode::RelativeVersion(id, behavior) => {
                let Some(reference) = find_installed(&installed, id) else {
                    return Ok(ProjectTargets::NotInstalled);
                };
                let request = CandidateRequest::Behavior(*behavior);
                let candidates = self
                    .resolver
                    .find_update(project, reference, &request, self.context, self.source, cancel)
                    .await?
                    .into_iter()
                    .collect();
                Ok(ProjectTargets::Candidates(candidates))
            }
        }
    }

    /// Candidate lookup for safe mode: highest patch within the installed
    /// major.minor, and only if it strictly exceeds the installed version
    async fn safe_candidate(
        &self,
        project: &dyn Project,
        reference: &InstalledPackage,
        cancel: &CancellationToken,
    ) -> Result<Option<PackageIdentity>> {
        let request = CandidateRequest::Behavior(DependencyBehavior::HighestPatch);
        let candidate = self
            .resolver
            .find_update(project, reference, &request, self.context, self.source, cancel)
            .await?;
        Ok(candidate.filter(|c| is_safe_candidate(reference.version(), &c.version)))
    }
}

/// Case-insensitive lookup of an installed reference by id
fn find_installed<'a>(
    installed: &'a [InstalledPackage],
    id: &str,
) -> Option<&'a InstalledPackage> {
    installed.iter().find(|p| p.identity.matches_id(id))
}

/// A safe update stays within the installed major.minor and moves forward
fn is_safe_candidate(installed: &Version, candidate: &Version) -> bool {
    candidate.major == installed.major
        && candidate.minor == installed.minor
        && candidate > installed
}
