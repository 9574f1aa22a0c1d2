//! Error taxonomy for the selection engine.

use crate::TargetId;
use thiserror::Error;

/// Errors surfaced by the selection engine and its configuration layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReticulumError {
    /// The engine was built without a view camera.
    #[error("reticulum requires a camera; none was supplied")]
    MissingCamera,
    /// The target is already in the collision list.
    #[error("{0} is already registered")]
    DuplicateTarget(TargetId),
    /// The target is not registered with this engine.
    #[error("{0} is not registered")]
    UnknownTarget(TargetId),
    /// An option value was rejected while resolving settings.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption {
        /// Option name as it appears in configuration.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// The engine was used after `destroy()`.
    #[error("reticulum has been destroyed")]
    Destroyed,
}

impl ReticulumError {
    /// Shorthand for an [`ReticulumError::InvalidOption`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name,
            reason: reason.into(),
        }
    }
}
