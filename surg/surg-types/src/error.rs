//! Error types for the interaction layer.
//!
//! Configuration errors (missing scene references, invalid thresholds) are
//! fatal and returned as `Err` during setup. Data errors (a named group
//! absent on a body, a duplicate clip membership entry) are recoverable:
//! the owning component logs a warning and disables the affected feature
//! for that entity only.

use thiserror::Error;

use crate::BodyId;

/// Errors that can occur while building or running the interaction layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurgError {
    /// Referenced body does not exist in the world.
    #[error("body not found: {name}")]
    BodyNotFound {
        /// Name of the missing body.
        name: String,
    },

    /// Referenced edge-graph does not exist in the world.
    #[error("graph not found: {name}")]
    GraphNotFound {
        /// Name of the missing graph.
        name: String,
    },

    /// Invalid body ID referenced.
    #[error("invalid body ID: {0}")]
    InvalidBodyId(u64),

    /// Invalid graph ID referenced.
    #[error("invalid graph ID: {0}")]
    InvalidGraphId(u64),

    /// A named particle group is absent on a body.
    #[error("body {body} has no particle group \"{group}\"")]
    GroupMissing {
        /// The body the group was looked up on.
        body: BodyId,
        /// The missing group name.
        group: String,
    },

    /// A body appears more than once in a clip membership list.
    #[error("body {0} registered twice as a clip target")]
    DuplicateClipTarget(BodyId),

    /// The interaction layer was built before the solver finished startup.
    #[error("solver has not completed startup")]
    SolverNotReady,

    /// Invalid configuration value.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// A procedure was built with no levels.
    #[error("procedure has no levels")]
    EmptyProcedure,

    /// A procedure level was built with no steps.
    #[error("procedure level {index} has no steps")]
    EmptyLevel {
        /// Index of the offending level.
        index: usize,
    },
}

impl SurgError {
    /// Create a body-not-found error.
    #[must_use]
    pub fn body_not_found(name: impl Into<String>) -> Self {
        Self::BodyNotFound { name: name.into() }
    }

    /// Create a graph-not-found error.
    #[must_use]
    pub fn graph_not_found(name: impl Into<String>) -> Self {
        Self::GraphNotFound { name: name.into() }
    }

    /// Create a group-missing error.
    #[must_use]
    pub fn group_missing(body: BodyId, group: impl Into<String>) -> Self {
        Self::GroupMissing {
            body,
            group: group.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if this is a fatal configuration error (aborts setup) rather
    /// than a recoverable data error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::BodyNotFound { .. }
                | Self::GraphNotFound { .. }
                | Self::InvalidBodyId(_)
                | Self::InvalidGraphId(_)
                | Self::SolverNotReady
                | Self::InvalidConfig { .. }
                | Self::EmptyProcedure
                | Self::EmptyLevel { .. }
        )
    }
}
