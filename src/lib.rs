// src/lib.rs

//! Uplift Package Update Orchestrator
//!
//! Given a workspace of projects, an optional package id, and update
//! preferences (safe patch-only, reinstall, pinned version, prerelease),
//! Uplift computes the ordered install/uninstall operations that bring each
//! project's package set to the desired state and executes them on a
//! background task while the caller blocks on an ordered completion
//! channel.
//!
//! # Architecture
//!
//! - Policy layer: mode selection, target selection, action planning, and
//!   reinstall sequencing (`update`)
//! - Boundary traits: the dependency resolver and action executor are
//!   external collaborators (`resolver`, `project`); reference
//!   implementations over TOML files ship in `repository` and `workspace`
//! - Completion protocol: one background task per invocation posts exactly
//!   one signal; the caller drains before returning (`update::Dispatcher`)
//! - Reporting: every outcome is an ordered (level, message) record through
//!   a `LogSink`; no error crosses the async boundary

pub mod commands;
mod error;
pub mod identity;
pub mod project;
pub mod report;
pub mod repository;
pub mod resolver;
pub mod update;
pub mod version;
pub mod workspace;

pub use error::{Error, Result};
pub use identity::{InstalledPackage, PackageIdentity};
pub use project::Project;
pub use report::{ConsoleSink, LogLevel, LogSink, MemorySink, TracingSink};
pub use resolver::{
    ActionExecutor, ActionKind, CandidateRequest, PackageAction, PackageSource,
    ResolutionContext, UpdateResolver,
};
pub use update::{UpdateEngine, UpdateMode, UpdateOptions};
pub use version::{DependencyBehavior, VersionRequest};
