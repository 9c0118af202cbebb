// src/error.rs

//! Error types for the update orchestrator

use thiserror::Error;

/// Errors produced by planning, dispatch, and the external boundaries
#[derive(Error, Debug)]
pub enum Error {
    /// The resolver could not produce a consistent action set
    #[error("resolution failed: {0}")]
    Resolution(String),

    /// An install/uninstall step failed mid-phase; completed steps are not
    /// rolled back
    #[error("execution failed: {0}")]
    Execution(String),

    /// An explicitly named package is not installed in any scoped project
    #[error("package '{0}' is not installed in any selected project")]
    TargetNotFound(String),

    /// A version token was neither a relative keyword nor a parseable version
    #[error("invalid version '{0}'")]
    InvalidVersion(String),

    /// Conflicting or incomplete update flags
    #[error("invalid update request: {0}")]
    InvalidRequest(String),

    /// Workspace manifest or package index could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The completion channel closed before every dispatched invocation
    /// reported back
    #[error("completion channel closed before all work finished")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
