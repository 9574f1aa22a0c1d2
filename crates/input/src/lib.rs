#![warn(missing_docs)]
//! Input plumbing for gaze selection: press/release sources, controller
//! lifecycle, an injectable event hub, and haptic output.

mod haptics;
mod hub;

pub use haptics::{Haptics, NoHaptics, RecordingHaptics, VibrationRequest};
pub use hub::{InputHub, InputSubscription};

use serde::{Deserialize, Serialize};
use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};

/// Identifier of a tracked hand controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControllerId(pub u8);

/// Where a press (mouse-down / touch-start / select-start) came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressSource {
    /// Primary mouse button.
    Mouse,
    /// Touch screen.
    Touch,
    /// XR controller trigger (select).
    Controller(ControllerId),
}

/// Input events the selection engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// Button/trigger went down.
    Press(PressSource),
    /// Button/trigger went up.
    Release(PressSource),
    /// A controller became available.
    ControllerConnected(ControllerId),
    /// A controller went away.
    ControllerDisconnected(ControllerId),
}

impl InputEvent {
    /// Translate a winit window event. Only the primary mouse button and touch
    /// start/end/cancel are relevant; everything else yields `None`.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::MouseInput { state, button, .. } => Self::from_mouse(*state, *button),
            WindowEvent::Touch(Touch { phase, .. }) => Self::from_touch(*phase),
            _ => None,
        }
    }

    /// Map a mouse button transition.
    pub fn from_mouse(state: ElementState, button: MouseButton) -> Option<Self> {
        if button != MouseButton::Left {
            return None;
        }
        Some(match state {
            ElementState::Pressed => Self::Press(PressSource::Mouse),
            ElementState::Released => Self::Release(PressSource::Mouse),
        })
    }

    /// Map a touch phase. A cancelled touch counts as a release.
    pub fn from_touch(phase: TouchPhase) -> Option<Self> {
        match phase {
            TouchPhase::Started => Some(Self::Press(PressSource::Touch)),
            TouchPhase::Ended | TouchPhase::Cancelled => Some(Self::Release(PressSource::Touch)),
            TouchPhase::Moved => None,
        }
    }

    /// Controller select-start.
    pub fn select_start(controller: ControllerId) -> Self {
        Self::Press(PressSource::Controller(controller))
    }

    /// Controller select-end.
    pub fn select_end(controller: ControllerId) -> Self {
        Self::Release(PressSource::Controller(controller))
    }
}
