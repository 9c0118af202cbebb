// src/update/sequence.rs

//! Reinstall phase ordering
//!
//! A reinstall action set mixes uninstall and install actions per package.
//! Execution must finish every uninstall before the first install so that a
//! package is fully gone before its replacement lands. The partition is
//! stable: actions keep their relative order within each phase.

use crate::resolver::{ActionKind, PackageAction};

/// A reinstall action set split into its two execution phases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReinstallPhases {
    pub uninstalls: Vec<PackageAction>,
    pub installs: Vec<PackageAction>,
}

/// Partition a reinstall action set by tag, preserving relative order
pub fn split_reinstall(actions: Vec<PackageAction>) -> ReinstallPhases {
    let (uninstalls, installs) = actions
        .into_iter()
        .partition(|action| action.kind == ActionKind::Uninstall);
    ReinstallPhases {
        uninstalls,
        installs,
    }
}
