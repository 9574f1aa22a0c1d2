#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod color;
pub mod error;
pub mod event;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

// Re-export commonly used types
pub use color::Color;
pub use error::ReticulumError;
pub use event::{GazeEventKind, GazeEventRecord};

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a gaze target for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u64);

impl TargetId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// Session clock advanced by the host's per-frame delta.
///
/// Elapsed time is kept in `f64` seconds so long sessions do not lose
/// precision when dwell times are computed as differences.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionClock {
    elapsed: f64,
}

impl SessionClock {
    /// Clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta` seconds. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, delta: f32) {
        if delta.is_finite() && delta > 0.0 {
            self.elapsed += f64::from(delta);
        }
    }

    /// Seconds elapsed since the clock started.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
