// src/update/behavior.rs

//! Mode-to-dependency-behavior mapping
//!
//! Which dependency behavior an invocation requests from the resolver
//! depends on the active mode, not on per-call judgment: updating
//! everything is the most aggressive case, a relative-version request
//! carries its own keyword, and everything else falls back to the
//! caller-configured baseline.

use super::UpdateMode;
use crate::version::DependencyBehavior;

/// Resolve the dependency behavior for one invocation
///
/// When no id was specified and the mode is not reinstall, the whole
/// installed set is moving, so the resolver is asked for the highest
/// versions unconditionally. A relative-version mode requests exactly its
/// keyword. All other modes use `baseline`.
pub fn dependency_behavior(mode: &UpdateMode, baseline: DependencyBehavior) -> DependencyBehavior {
    match mode {
        UpdateMode::AllPackages | UpdateMode::Safe(None) => DependencyBehavior::Highest,
        UpdateMode::RelativeVersion(_, behavior) => *behavior,
        _ => baseline,
    }
}
