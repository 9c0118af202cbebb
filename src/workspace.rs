// src/workspace.rs

//! TOML-backed workspace: the host environment for the CLI
//!
//! A workspace manifest lists projects and the packages installed in each.
//! The manifest doubles as the project store (read side, `Project`) and the
//! install state the executor applies actions to (write side,
//! `WorkspaceExecutor`). The orchestrator itself never touches this module;
//! it only sees the boundary traits.
//!
//! Manifest format:
//!
//! ```toml
//! [[project]]
//! name = "api"
//!
//! [[project.package]]
//! id = "serilog"
//! version = "2.10.0"
//! ```

use crate::error::{Error, Result};
use crate::identity::{InstalledPackage, PackageIdentity};
use crate::project::Project;
use crate::resolver::{ActionExecutor, ActionKind, PackageAction};
use async_trait::async_trait;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// On-disk manifest root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "project")]
    pub projects: Vec<ProjectEntry>,
}

/// One project and its installed packages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default, rename = "package")]
    pub packages: Vec<PackageEntry>,
}

/// One installed package record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageEntry {
    pub id: String,
    pub version: String,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| Error::Parse(format!("workspace manifest {}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| Error::Parse(format!("workspace manifest: {}", e)))?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// A loaded workspace shared between project views and the executor
#[derive(Clone)]
pub struct Workspace {
    path: PathBuf,
    manifest: Arc<Mutex<Manifest>>,
}

impl Workspace {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let manifest = Manifest::load(&path)?;
        Ok(Self {
            path,
            manifest: Arc::new(Mutex::new(manifest)),
        })
    }

    pub fn project_names(&self) -> Vec<String> {
        self.manifest
            .lock()
            .unwrap()
            .projects
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    /// Project views over every manifest entry
    pub fn projects(&self) -> Vec<Arc<dyn Project>> {
        self.project_names()
            .into_iter()
            .map(|name| {
                Arc::new(WorkspaceProject {
                    name,
                    manifest: self.manifest.clone(),
                }) as Arc<dyn Project>
            })
            .collect()
    }

    /// A single project view by name, case-insensitive
    pub fn project(&self, name: &str) -> Option<Arc<dyn Project>> {
        self.project_names()
            .into_iter()
            .find(|n| n.eq_ignore_ascii_case(name))
            .map(|name| {
                Arc::new(WorkspaceProject {
                    name,
                    manifest: self.manifest.clone(),
                }) as Arc<dyn Project>
            })
    }

    /// Executor that applies actions to this workspace and persists it
    pub fn executor(&self) -> WorkspaceExecutor {
        WorkspaceExecutor {
            path: self.path.clone(),
            manifest: self.manifest.clone(),
        }
    }

    /// Snapshot of the current manifest state
    pub fn manifest(&self) -> Manifest {
        self.manifest.lock().unwrap().clone()
    }
}

/// Read-only project view over one manifest entry
struct WorkspaceProject {
    name: String,
    manifest: Arc<Mutex<Manifest>>,
}

#[async_trait]
impl Project for WorkspaceProject {
    fn name(&self) -> &str {
        &self.name
    }

    async fn installed_packages(
        &self,
        _cancel: &CancellationToken,
    ) -> Result<Vec<InstalledPackage>> {
        let manifest = self.manifest.lock().unwrap();
        let Some(entry) = manifest.projects.iter().find(|p| p.name == self.name) else {
            return Ok(Vec::new());
        };
        entry
            .packages
            .iter()
            .map(|p| {
                let version = Version::parse(&p.version).map_err(|e| {
                    Error::Parse(format!("package '{}' version '{}': {}", p.id, p.version, e))
                })?;
                Ok(InstalledPackage::new(PackageIdentity::new(
                    p.id.clone(),
                    version,
                )))
            })
            .collect()
    }
}

/// Applies action sets to the workspace manifest and writes it back
pub struct WorkspaceExecutor {
    path: PathBuf,
    manifest: Arc<Mutex<Manifest>>,
}

#[async_trait]
impl ActionExecutor for WorkspaceExecutor {
    async fn execute(
        &self,
        project: &dyn Project,
        actions: &[PackageAction],
        _cancel: &CancellationToken,
    ) -> Result<()> {
        {
            let mut manifest = self.manifest.lock().unwrap();
            let entry = manifest
                .projects
                .iter_mut()
                .find(|p| p.name == project.name())
                .ok_or_else(|| {
                    Error::Execution(format!("project '{}' not in workspace", project.name()))
                })?;

            for action in actions {
                let id = &action.identity.id;
                match action.kind {
                    ActionKind::Uninstall => {
                        entry.packages.retain(|p| !p.id.eq_ignore_ascii_case(id));
                    }
                    ActionKind::Install => {
                        entry.packages.retain(|p| !p.id.eq_ignore_ascii_case(id));
                        entry.packages.push(PackageEntry {
                            id: id.clone(),
                            version: action.identity.version.to_string(),
                        });
                    }
                }
                info!("{}: {}", project.name(), action);
            }
        }

        let manifest = self.manifest.lock().unwrap().clone();
        manifest.save(&self.path)
    }
}
