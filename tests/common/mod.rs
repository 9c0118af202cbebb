// tests/common/mod.rs

//! Shared test doubles for the update workflow tests.
//!
//! `MemoryProject` plays the host environment, `RecordingResolver` wraps
//! the index-backed resolver and records every preview call, and
//! `RecordingExecutor` records execution order while applying actions back
//! to the in-memory projects so repeated runs see updated state.

use async_trait::async_trait;
use semver::Version;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use uplift::repository::{IndexResolver, PackageIndex};
use uplift::{
    ActionExecutor, ActionKind, CandidateRequest, Error, InstalledPackage, MemorySink,
    PackageAction, PackageIdentity, PackageSource, Project, ResolutionContext, Result,
    UpdateEngine, UpdateMode, UpdateOptions, UpdateResolver,
};

pub fn ident(id: &str, version: &str) -> PackageIdentity {
    PackageIdentity::new(id, Version::parse(version).unwrap())
}

pub fn installed(id: &str, version: &str) -> InstalledPackage {
    InstalledPackage::new(ident(id, version))
}

/// In-memory project whose installed set the executor can move
pub struct MemoryProject {
    name: String,
    installed: Mutex<Vec<InstalledPackage>>,
}

impl MemoryProject {
    pub fn new(name: &str, packages: Vec<InstalledPackage>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            installed: Mutex::new(packages),
        })
    }

    pub fn installed(&self) -> Vec<InstalledPackage> {
        self.installed.lock().unwrap().clone()
    }

    pub fn apply(&self, actions: &[PackageAction]) {
        let mut packages = self.installed.lock().unwrap();
        for action in actions {
            let id = &action.identity.id;
            match action.kind {
                ActionKind::Uninstall => {
                    packages.retain(|p| !p.identity.matches_id(id));
                }
                ActionKind::Install => {
                    packages.retain(|p| !p.identity.matches_id(id));
                    packages.push(InstalledPackage::new(action.identity.clone()));
                }
            }
        }
    }
}

#[async_trait]
impl Project for MemoryProject {
    fn name(&self) -> &str {
        &self.name
    }

    async fn installed_packages(
        &self,
        _cancel: &CancellationToken,
    ) -> Result<Vec<InstalledPackage>> {
        Ok(self.installed())
    }
}

/// One recorded executor invocation
#[derive(Debug, Clone)]
pub struct ExecutorCall {
    pub project: String,
    pub actions: Vec<PackageAction>,
}

/// Records execution order and applies actions to the matching project
pub struct RecordingExecutor {
    calls: Mutex<Vec<ExecutorCall>>,
    targets: Vec<Arc<MemoryProject>>,
}

impl RecordingExecutor {
    pub fn new(targets: Vec<Arc<MemoryProject>>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            targets,
        })
    }

    pub fn calls(&self) -> Vec<ExecutorCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionExecutor for RecordingExecutor {
    async fn execute(
        &self,
        project: &dyn Project,
        actions: &[PackageAction],
        _cancel: &CancellationToken,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(ExecutorCall {
            project: project.name().to_string(),
            actions: actions.to_vec(),
        });
        if let Some(target) = self.targets.iter().find(|t| t.name == project.name()) {
            target.apply(actions);
        }
        Ok(())
    }
}

/// Index-backed resolver that records every preview request
pub struct RecordingResolver {
    inner: IndexResolver,
    preview_installs: Mutex<Vec<PackageIdentity>>,
    preview_updates: Mutex<Vec<Vec<String>>>,
    preview_reinstalls: Mutex<Vec<Vec<PackageIdentity>>>,
}

impl RecordingResolver {
    pub fn new(index_toml: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: IndexResolver::new(PackageIndex::parse(index_toml).unwrap()),
            preview_installs: Mutex::new(Vec::new()),
            preview_updates: Mutex::new(Vec::new()),
            preview_reinstalls: Mutex::new(Vec::new()),
        })
    }

    pub fn preview_installs(&self) -> Vec<PackageIdentity> {
        self.preview_installs.lock().unwrap().clone()
    }

    pub fn preview_updates(&self) -> Vec<Vec<String>> {
        self.preview_updates.lock().unwrap().clone()
    }

    pub fn preview_reinstalls(&self) -> Vec<Vec<PackageIdentity>> {
        self.preview_reinstalls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpdateResolver for RecordingResolver {
    async fn preview_install(
        &self,
        project: &dyn Project,
        identity: &PackageIdentity,
        context: &ResolutionContext,
        source: &PackageSource,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>> {
        self.preview_installs.lock().unwrap().push(identity.clone());
        self.inner
            .preview_install(project, identity, context, source, cancel)
            .await
    }

    async fn preview_update(
        &self,
        project: &dyn Project,
        ids: &[String],
        context: &ResolutionContext,
        source: &PackageSource,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>> {
        self.preview_updates.lock().unwrap().push(ids.to_vec());
        self.inner
            .preview_update(project, ids, context, source, cancel)
            .await
    }

    async fn preview_reinstall(
        &self,
        project: &dyn Project,
        identities: &[PackageIdentity],
        context: &ResolutionContext,
        source: &PackageSource,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>> {
        self.preview_reinstalls
            .lock()
            .unwrap()
            .push(identities.to_vec());
        self.inner
            .preview_reinstall(project, identities, context, source, cancel)
            .await
    }

    async fn find_update(
        &self,
        project: &dyn Project,
        installed: &InstalledPackage,
        request: &CandidateRequest,
        context: &ResolutionContext,
        source: &PackageSource,
        cancel: &CancellationToken,
    ) -> Result<Option<PackageIdentity>> {
        self.inner
            .find_update(project, installed, request, context, source, cancel)
            .await
    }
}

/// Resolver whose every preview fails, for the error-boundary tests
pub struct FailingResolver;

#[async_trait]
impl UpdateResolver for FailingResolver {
    async fn preview_install(
        &self,
        _project: &dyn Project,
        _identity: &PackageIdentity,
        _context: &ResolutionContext,
        _source: &PackageSource,
        _cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>> {
        Err(Error::Resolution("source unreachable".to_string()))
    }

    async fn preview_update(
        &self,
        _project: &dyn Project,
        _ids: &[String],
        _context: &ResolutionContext,
        _source: &PackageSource,
        _cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>> {
        Err(Error::Resolution("source unreachable".to_string()))
    }

    async fn preview_reinstall(
        &self,
        _project: &dyn Project,
        _identities: &[PackageIdentity],
        _context: &ResolutionContext,
        _source: &PackageSource,
        _cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>> {
        Err(Error::Resolution("source unreachable".to_string()))
    }

    async fn find_update(
        &self,
        _project: &dyn Project,
        _installed: &InstalledPackage,
        _request: &CandidateRequest,
        _context: &ResolutionContext,
        _source: &PackageSource,
        _cancel: &CancellationToken,
    ) -> Result<Option<PackageIdentity>> {
        Err(Error::Resolution("source unreachable".to_string()))
    }
}

/// Build the engine, run one invocation, and return the collected report
pub fn run_update(
    projects: &[Arc<MemoryProject>],
    resolver: Arc<dyn UpdateResolver>,
    executor: Arc<dyn ActionExecutor>,
    options: UpdateOptions,
    mode: UpdateMode,
) -> Arc<MemorySink> {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let sink = Arc::new(MemorySink::new());

    let projects: Vec<Arc<dyn Project>> = projects
        .iter()
        .map(|p| p.clone() as Arc<dyn Project>)
        .collect();

    let engine = UpdateEngine::new(
        runtime.handle().clone(),
        projects,
        resolver,
        executor,
        PackageSource::new("test", "https://packages.test/v1"),
        sink.clone(),
    )
    .with_options(options);

    engine.run(mode).unwrap();
    sink
}
