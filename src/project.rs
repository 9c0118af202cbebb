// src/project.rs

//! Project boundary trait
//!
//! A project is anything that owns a set of installed packages: a build
//! workspace member, a deployment target, a manifest file. The host
//! environment supplies the implementations; the orchestrator only reads.

use crate::error::Result;
use crate::identity::InstalledPackage;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// One update target owned by the host environment
#[async_trait]
pub trait Project: Send + Sync {
    /// Human-readable project name, used in report records
    fn name(&self) -> &str;

    /// Every package currently installed in this project
    async fn installed_packages(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<InstalledPackage>>;
}
