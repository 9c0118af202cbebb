// src/repository/mod.rs

//! Index-backed reference resolver
//!
//! A package index is a TOML file listing the versions available per
//! package id at one source. `IndexResolver` implements the resolver
//! boundary over it with direct version selection: pick the candidate the
//! dependency behavior asks for, emit uninstall/install pairs for moves.
//! It deliberately resolves nothing transitively — dependency-closure
//! computation belongs to a real package-management subsystem.
//!
//! Index format:
//!
//! ```toml
//! name = "central"
//! url = "https://packages.example.com/v1"
//!
//! [[package]]
//! id = "serilog"
//! versions = ["2.10.0", "2.10.4", "2.12.0"]
//! ```

use crate::error::{Error, Result};
use crate::identity::{InstalledPackage, PackageIdentity};
use crate::project::Project;
use crate::resolver::{
    CandidateRequest, PackageAction, PackageSource, ResolutionContext, UpdateResolver,
};
use crate::version::DependencyBehavior;
use async_trait::async_trait;
use semver::Version;
use serde::Deserialize;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RawIndex {
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default, rename = "package")]
    packages: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: String,
    versions: Vec<String>,
}

/// One indexed package: canonical id plus available versions, ascending
#[derive(Debug, Clone)]
struct IndexEntry {
    id: String,
    versions: Vec<Version>,
}

/// Available-version index for one package source
#[derive(Debug, Clone)]
pub struct PackageIndex {
    source: PackageSource,
    packages: Vec<IndexEntry>,
}

impl PackageIndex {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
            .map_err(|e| Error::Parse(format!("package index {}: {}", path.display(), e)))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawIndex =
            toml::from_str(text).map_err(|e| Error::Parse(e.to_string()))?;

        let mut packages = Vec::with_capacity(raw.packages.len());
        for entry in raw.packages {
            let mut versions = entry
                .versions
                .iter()
                .map(|v| {
                    Version::parse(v).map_err(|e| {
                        Error::Parse(format!("package '{}' version '{}': {}", entry.id, v, e))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            versions.sort();
            packages.push(IndexEntry {
                id: entry.id,
                versions,
            });
        }

        Ok(Self {
            source: PackageSource::new(raw.name, raw.url),
            packages,
        })
    }

    pub fn source(&self) -> &PackageSource {
        &self.source
    }

    fn entry(&self, id: &str) -> Option<&IndexEntry> {
        self.packages.iter().find(|e| e.id.eq_ignore_ascii_case(id))
    }

    fn has_version(&self, identity: &PackageIdentity) -> bool {
        self.entry(&identity.id)
            .is_some_and(|e| e.versions.contains(&identity.version))
    }
}

/// Resolver boundary implementation over a `PackageIndex`
pub struct IndexResolver {
    index: PackageIndex,
}

impl IndexResolver {
    pub fn new(index: PackageIndex) -> Self {
        Self { index }
    }

    /// Pick the update candidate for one installed version
    ///
    /// Behavior windows are relative to the installed version: `highest`
    /// considers everything, `highest-minor` stays within the installed
    /// major, `highest-patch` within the installed major.minor, and
    /// `lowest` takes the smallest step forward. All windows require the
    /// candidate to strictly exceed the installed version; an exact request
    /// just needs the version to exist at the source.
    fn select_candidate(
        &self,
        installed: &PackageIdentity,
        request: &CandidateRequest,
        context: &ResolutionContext,
    ) -> Option<PackageIdentity> {
        let entry = self.index.entry(&installed.id)?;
        let allowed = entry
            .versions
            .iter()
            .filter(|v| context.allow_prerelease || v.pre.is_empty());

        let current = &installed.version;
        let picked = match request {
            CandidateRequest::Exact(version) => allowed.filter(|v| *v == version).next_back(),
            CandidateRequest::Behavior(behavior) => {
                let mut newer = allowed.filter(|v| *v > current);
                match behavior {
                    DependencyBehavior::Highest => newer.next_back(),
                    DependencyBehavior::HighestMinor => {
                        newer.filter(|v| v.major == current.major).next_back()
                    }
                    DependencyBehavior::HighestPatch => newer
                        .filter(|v| v.major == current.major && v.minor == current.minor)
                        .next_back(),
                    DependencyBehavior::Lowest => newer.next(),
                }
            }
        };

        picked.map(|version| PackageIdentity::new(entry.id.clone(), version.clone()))
    }
}

#[async_trait]
impl UpdateResolver for IndexResolver {
    async fn preview_install(
        &self,
        project: &dyn Project,
        identity: &PackageIdentity,
        _context: &ResolutionContext,
        source: &PackageSource,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>> {
        if !self.index.has_version(identity) {
            return Err(Error::Resolution(format!(
                "{} not available at source '{}'",
                identity, source
            )));
        }

        let installed = project.installed_packages(cancel).await?;
        let existing = installed
            .iter()
            .find(|p| p.identity.matches_id(&identity.id));

        let actions = match existing {
            Some(current) if &current.identity == identity => Vec::new(),
            Some(current) => vec![
                PackageAction::uninstall(current.identity.clone()),
                PackageAction::install(identity.clone()),
            ],
            None => vec![PackageAction::install(identity.clone())],
        };
        Ok(actions)
    }

    async fn preview_update(
        &self,
        project: &dyn Project,
        ids: &[String],
        context: &ResolutionContext,
        _source: &PackageSource,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>> {
        let installed = project.installed_packages(cancel).await?;
        let mut actions = Vec::new();

        for id in ids {
            let Some(current) = installed.iter().find(|p| p.identity.matches_id(id)) else {
                continue;
            };
            let request = CandidateRequest::Behavior(context.behavior);
            if let Some(candidate) = self.select_candidate(&current.identity, &request, context) {
                debug!("update candidate: {} -> {}", current.identity, candidate);
                actions.push(PackageAction::uninstall(current.identity.clone()));
                actions.push(PackageAction::install(candidate));
            }
        }
        Ok(actions)
    }

    async fn preview_reinstall(
        &self,
        _project: &dyn Project,
        identities: &[PackageIdentity],
        _context: &ResolutionContext,
        source: &PackageSource,
        _cancel: &CancellationToken,
    ) -> Result<Vec<PackageAction>> {
        let mut actions = Vec::new();
        for identity in identities {
            if !self.index.has_version(identity) {
                return Err(Error::Resolution(format!(
                    "{} not available at source '{}'",
                    identity, source
                )));
            }
            actions.push(PackageAction::uninstall(identity.clone()));
            actions.push(PackageAction::install(identity.clone()));
        }
        Ok(actions)
    }

    async fn find_update(
        &self,
        _project: &dyn Project,
        installed: &InstalledPackage,
        request: &CandidateRequest,
        context: &ResolutionContext,
        _source: &PackageSource,
        _cancel: &CancellationToken,
    ) -> Result<Option<PackageIdentity>> {
        Ok(self.select_candidate(&installed.identity, request, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"
        name = "central"
        url = "https://packages.example.com/v1"

        [[package]]
        id = "Serilog"
        versions = ["2.10.0", "2.10.4", "2.12.0", "3.0.0-beta1", "3.0.0"]

        [[package]]
        id = "xunit"
        versions = ["2.4.1"]
    "#;

    struct FixedProject {
        name: String,
        installed: Vec<InstalledPackage>,
    }

    #[async_trait]
    impl Project for FixedProject {
        fn name(&self) -> &str {
            &self.name
        }

        async fn installed_packages(
            &self,
            _cancel: &CancellationToken,
        ) -> Result<Vec<InstalledPackage>> {
            Ok(self.installed.clone())
        }
    }

    fn ident(id: &str, version: &str) -> PackageIdentity {
        PackageIdentity::new(id, Version::parse(version).unwrap())
    }

    fn resolver() -> IndexResolver {
        IndexResolver::new(PackageIndex::parse(INDEX).unwrap())
    }

    fn context(behavior: DependencyBehavior) -> ResolutionContext {
        ResolutionContext::new(behavior, false)
    }

    #[test]
    fn test_candidate_per_behavior_window() {
        let resolver = resolver();
        let installed = ident("serilog", "2.10.0");
        let ctx = context(DependencyBehavior::Highest);

        let pick = |behavior| {
            resolver
                .select_candidate(&installed, &CandidateRequest::Behavior(behavior), &ctx)
                .map(|c| c.version.to_string())
        };

        assert_eq!(pick(DependencyBehavior::Highest), Some("3.0.0".into()));
        assert_eq!(pick(DependencyBehavior::HighestMinor), Some("2.12.0".into()));
        assert_eq!(pick(DependencyBehavior::HighestPatch), Some("2.10.4".into()));
        assert_eq!(pick(DependencyBehavior::Lowest), Some("2.10.4".into()));
    }

    #[test]
    fn test_candidate_skips_prerelease_unless_allowed() {
        let resolver = resolver();
        let installed = ident("serilog", "2.12.0");

        let stable = resolver.select_candidate(
            &installed,
            &CandidateRequest::Behavior(DependencyBehavior::Highest),
            &context(DependencyBehavior::Highest),
        );
        assert_eq!(stable.unwrap().version, Version::parse("3.0.0").unwrap());

        let with_pre = resolver.select_candidate(
            &installed,
            &CandidateRequest::Behavior(DependencyBehavior::Lowest),
            &ResolutionContext::new(DependencyBehavior::Lowest, true),
        );
        assert_eq!(
            with_pre.unwrap().version,
            Version::parse("3.0.0-beta1").unwrap()
        );
    }

    #[test]
    fn test_exact_candidate_requires_indexed_version() {
        let resolver = resolver();
        let installed = ident("serilog", "2.10.0");
        let ctx = context(DependencyBehavior::Lowest);

        let hit = resolver.select_candidate(
            &installed,
            &CandidateRequest::Exact(Version::parse("2.12.0").unwrap()),
            &ctx,
        );
        assert_eq!(hit.unwrap(), ident("Serilog", "2.12.0"));

        let miss = resolver.select_candidate(
            &installed,
            &CandidateRequest::Exact(Version::parse("9.9.9").unwrap()),
            &ctx,
        );
        assert!(miss.is_none());
    }

    #[test]
    fn test_candidate_uses_canonical_id_casing() {
        let resolver = resolver();
        let candidate = resolver.select_candidate(
            &ident("SERILOG", "2.10.0"),
            &CandidateRequest::Behavior(DependencyBehavior::Highest),
            &context(DependencyBehavior::Highest),
        );
        assert_eq!(candidate.unwrap().id, "Serilog");
    }

    #[tokio::test]
    async fn test_preview_update_emits_move_pairs() {
        let resolver = resolver();
        let project = FixedProject {
            name: "api".into(),
            installed: vec![
                InstalledPackage::new(ident("serilog", "2.10.0")),
                InstalledPackage::new(ident("xunit", "2.4.1")),
            ],
        };
        let ctx = context(DependencyBehavior::Highest);
        let cancel = CancellationToken::new();

        let ids = vec!["serilog".to_string(), "xunit".to_string()];
        let actions = resolver
            .preview_update(&project, &ids, &ctx, resolver.index.source(), &cancel)
            .await
            .unwrap();

        // xunit has no newer version, so only serilog moves
        assert_eq!(
            actions,
            vec![
                PackageAction::uninstall(ident("serilog", "2.10.0")),
                PackageAction::install(ident("Serilog", "3.0.0")),
            ]
        );
    }

    #[tokio::test]
    async fn test_preview_install_already_satisfied_is_empty() {
        let resolver = resolver();
        let project = FixedProject {
            name: "api".into(),
            installed: vec![InstalledPackage::new(ident("xunit", "2.4.1"))],
        };
        let ctx = context(DependencyBehavior::Lowest);
        let cancel = CancellationToken::new();

        let actions = resolver
            .preview_install(
                &project,
                &ident("xunit", "2.4.1"),
                &ctx,
                resolver.index.source(),
                &cancel,
            )
            .await
            .unwrap();
        assert!(actions.is_empty());
    }

    #[tokio::test]
    async fn test_preview_reinstall_rejects_unknown_version() {
        let resolver = resolver();
        let project = FixedProject {
            name: "api".into(),
            installed: Vec::new(),
        };
        let ctx = context(DependencyBehavior::Lowest);
        let cancel = CancellationToken::new();

        let result = resolver
            .preview_reinstall(
                &project,
                &[ident("ghost", "1.0.0")],
                &ctx,
                resolver.index.source(),
                &cancel,
            )
            .await;
        assert!(matches!(result, Err(Error::Resolution(_))));
    }
}
