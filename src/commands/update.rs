// src/commands/update.rs
//! Update command

use crate::report::ConsoleSink;
use crate::repository::{IndexResolver, PackageIndex};
use crate::update::{UpdateEngine, UpdateMode, UpdateOptions};
use crate::version::DependencyBehavior;
use crate::workspace::Workspace;
use anyhow::{Result, anyhow};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Raw flags from the command line, one invocation's worth
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub id: Option<String>,
    pub version: Option<String>,
    pub project: Option<String>,
    pub safe: bool,
    pub reinstall: bool,
    pub prerelease: bool,
    pub dry_run: bool,
}

/// Check for and apply package updates across the workspace
pub fn cmd_update(workspace_path: &str, index_path: &str, request: UpdateRequest) -> Result<()> {
    info!("Planning package updates");

    let workspace = Workspace::open(workspace_path)?;
    let index = PackageIndex::load(Path::new(index_path))?;
    let source = index.source().clone();

    let projects = match &request.project {
        Some(name) => {
            let project = workspace
                .project(name)
                .ok_or_else(|| anyhow!("project '{}' not found in workspace", name))?;
            vec![project]
        }
        None => workspace.projects(),
    };
    if projects.is_empty() {
        println!("Workspace has no projects");
        return Ok(());
    }

    let mode = UpdateMode::from_request(
        request.id,
        request.version.as_deref(),
        request.safe,
        request.reinstall,
    )?;
    info!("Update mode: {:?}", mode);

    let options = UpdateOptions {
        allow_prerelease: request.prerelease,
        include_unlisted: false,
        dry_run: request.dry_run,
        baseline_behavior: DependencyBehavior::Lowest,
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let engine = UpdateEngine::new(
        runtime.handle().clone(),
        projects,
        Arc::new(IndexResolver::new(index)),
        Arc::new(workspace.executor()),
        source,
        Arc::new(ConsoleSink::new()),
    )
    .with_options(options);

    engine.run(mode)?;

    if request.dry_run {
        println!("Dry run complete; no changes were made");
    }
    Ok(())
}
