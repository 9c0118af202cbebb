// src/update/planner.rs

//! Action planning against the resolver boundary
//!
//! Turns the selected targets for one project into a single ordered action
//! set. Batched targets go to the resolver in one call so that
//! cross-package constraints are resolved together; concrete candidates are
//! previewed one at a time and concatenated.

use super::targets::ProjectTargets;
use crate::error::Result;
use crate::project::Project;
use crate::resolver::{PackageAction, PackageSource, ResolutionContext, UpdateResolver};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The planned actions for one project, in execution order
///
/// Immutable after planning; consumed exactly once by execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectActionSet {
    pub project: String,
    pub actions: Vec<PackageAction>,
}

impl ProjectActionSet {
    /// An empty set is a no-op outcome: reported, never executed
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Builds per-project action sets from selected targets
pub struct ActionPlanner<'a> {
    resolver: &'a dyn UpdateResolver,
    context: &'a ResolutionContext,
    source: &'a PackageSource,
}

impl<'a> ActionPlanner<'a> {
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

    /// Preview the action set for one project
    ///
    /// Resolver failures propagate; an empty result is a valid no-op plan.
    pub async fn plan(
        &self,
        project: &dyn Project,
        targets: ProjectTargets,
        cancel: &CancellationToken,
    ) -> Result<ProjectActionSet> {
        let actions = match targets {
            ProjectTargets::Batch(ids) => {
                self.resolver
                    .preview_update(project, &ids, self.context, self.source, cancel)
                    .await?
            }
            ProjectTargets::Reinstall(identities) => {
                self.resolver
                    .preview_reinstall(project, &identities, self.context, self.source, cancel)
                    .await?
            }
            ProjectTargets::Candidates(candidates) => {
                let mut actions = Vec::new();
                for candidate in &candidates {
                    let previewed = self
                        .resolver
                        .preview_install(project, candidate, self.context, self.source, cancel)
                        .await?;
                    // A candidate that resolves to nothing is skipped, not
                    // a plan failure.
                    if !previewed.is_empty() {
                        actions.extend(previewed);
                    }
                }
                actions
            }
            ProjectTargets::NotInstalled | ProjectTargets::Empty => Vec::new(),
        };

        debug!(
            "planned {} action(s) for project '{}'",
            actions.len(),
            project.name()
        );
        Ok(ProjectActionSet {
            project: project.name().to_string(),
            actions,
        })
    }
}
