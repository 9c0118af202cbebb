// src/update/engine.rs

//! The update engine: dispatch, per-project pipeline, completion drain
//!
//! `UpdateEngine::run` is the single entry point for an update invocation.
//! It derives the resolution context from the mode and flags, launches the
//! select→plan→execute pipeline for all scoped projects as one background
//! task, and blocks until that task signals completion. Any pipeline error
//! is converted to a single error record at the dispatch boundary; nothing
//! re-raises into the calling thread.

use super::UpdateMode;
use super::behavior::dependency_behavior;
use super::dispatch::Dispatcher;
use super::planner::{ActionPlanner, ProjectActionSet};
use super::sequence::split_reinstall;
use super::targets::{ProjectTargets, TargetSelector};
use crate::error::{Error, Result};
use crate::project::Project;
use crate::report::LogSink;
use crate::resolver::{ActionExecutor, PackageSource, ResolutionContext, UpdateResolver};
use crate::version::DependencyBehavior;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Invocation-level flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Allow prerelease versions to be selected
    pub allow_prerelease: bool,
    /// Allow versions delisted from the source
    pub include_unlisted: bool,
    /// Report the plan instead of executing it
    pub dry_run: bool,
    /// Dependency behavior for modes that do not dictate their own
    pub baseline_behavior: DependencyBehavior,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            allow_prerelease: false,
            include_unlisted: false,
            dry_run: false,
            baseline_behavior: DependencyBehavior::Lowest,
        }
    }
}

/// Orchestrates one update invocation across a set of projects
pub struct UpdateEngine {
    handle: Handle,
    projects: Vec<Arc<dyn Project>>,
    resolver: Arc<dyn UpdateResolver>,
    executor: Arc<dyn ActionExecutor>,
    source: PackageSource,
    sink: Arc<dyn LogSink>,
    options: UpdateOptions,
}

impl UpdateEngine {
    pub fn new(
        handle: Handle,
        projects: Vec<Arc<dyn Project>>,
        resolver: Arc<dyn UpdateResolver>,
        executor: Arc<dyn ActionExecutor>,
        source: PackageSource,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            handle,
            projects,
            resolver,
            executor,
            source,
            sink,
            options: UpdateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: UpdateOptions) -> Self {
        self.options = options;
        self
    }

    /// Run one update invocation and block until it completes
    ///
    /// The pipeline runs on a background task; the calling thread parks on
    /// the completion drain. Failures inside the pipeline surface as one
    /// error record through the sink, never as an `Err` here — the only
    /// error this returns is a broken completion channel.
    pub fn run(&self, mode: UpdateMode) -> Result<()> {
        let mut dispatcher = Dispatcher::new(self.handle.clone());

        let pipeline = PipelineState {
            projects: self.projects.clone(),
            resolver: self.resolver.clone(),
            executor: self.executor.clone(),
            source: self.source.clone(),
            sink: self.sink.clone(),
            options: self.options,
        };
        let sink = self.sink.clone();

        dispatcher.dispatch(async move {
            if let Err(err) = pipeline.run(mode).await {
                sink.error(&err.to_string());
            }
        });
        dispatcher.drain()
    }
}

/// Everything the background task needs, detached from the engine
#[derive(Clone)]
struct PipelineState {
    projects: Vec<Arc<dyn Project>>,
    resolver: Arc<dyn UpdateResolver>,
    executor: Arc<dyn ActionExecutor>,
    source: PackageSource,
    sink: Arc<dyn LogSink>,
    options: UpdateOptions,
}

impl PipelineState {
    async fn run(self, mode: UpdateMode) -> Result<()> {
        let behavior = dependency_behavior(&mode, self.options.baseline_behavior);
        let allow_prerelease = self.options.allow_prerelease || mode.forces_prerelease();
        let mut context = ResolutionContext::new(behavior, allow_prerelease);
        context.include_unlisted = self.options.include_unlisted;
        debug!(
            "update pipeline: behavior={}, prerelease={}",
            context.behavior, context.allow_prerelease
        );

        // Dispatched work is never aborted mid-flight; the token exists for
        // the boundary contract and stays untriggered.
        let cancel = CancellationToken::new();

        let selector = TargetSelector::new(self.resolver.as_ref(), &context, &self.source);
        let planner = ActionPlanner::new(self.resolver.as_ref(), &context, &self.source);

        let explicit = mode.explicit_id().map(str::to_string);
        let mut installed_anywhere = explicit.is_none();

        for project in &self.projects {
            let targets = selector.select(project.as_ref(), &mode, &cancel).await?;
            if targets == ProjectTargets::NotInstalled {
                continue;
            }
            if explicit.is_some() {
                installed_anywhere = true;
            }

            let set = planner.plan(project.as_ref(), targets, &cancel).await?;
            if set.is_empty() {
                self.sink.info(&format!(
                    "No package updates for project '{}'",
                    project.name()
                ));
                continue;
            }

            if self.options.dry_run {
                self.report_plan(&set);
            } else if mode.is_reinstall() {
                // Uninstalls must be fully done, per project, before the
                // first install begins.
                let phases = split_reinstall(set.actions);
                self.executor
                    .execute(project.as_ref(), &phases.uninstalls, &cancel)
                    .await?;
                self.executor
                    .execute(project.as_ref(), &phases.installs, &cancel)
                    .await?;
            } else {
                self.executor
                    .execute(project.as_ref(), &set.actions, &cancel)
                    .await?;
            }
        }

        // Reported once, after every scoped project has been checked.
        if let Some(id) = explicit
            && !installed_anywhere
        {
            return Err(Error::TargetNotFound(id));
        }
        Ok(())
    }

    fn report_plan(&self, set: &ProjectActionSet) {
        self.sink.info(&format!(
            "Project '{}': {} planned action(s)",
            set.project,
            set.actions.len()
        ));
        for action in &set.actions {
            self.sink.info(&format!("  {}", action));
        }
    }
}
