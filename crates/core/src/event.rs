//! Gaze events emitted by the selection engine.

use crate::TargetId;
use serde::{Deserialize, Serialize};

/// The four callback slots a target can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GazeEventKind {
    /// Gaze entered the target.
    Over,
    /// Gaze left the target.
    Out,
    /// Dwell reached the fuse duration.
    Long,
    /// A press/release pair completed while aimed at the target.
    Click,
}

impl GazeEventKind {
    /// Stable label used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Over => "over",
            Self::Out => "out",
            Self::Long => "long",
            Self::Click => "click",
        }
    }
}

/// A fired event, stamped with the session clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeEventRecord {
    /// Session time in seconds when the event fired.
    pub time: f64,
    /// Target that received the event.
    pub target: TargetId,
    /// Which callback slot fired.
    pub kind: GazeEventKind,
}
