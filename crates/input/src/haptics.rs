//! Best-effort haptic feedback.

use crate::ControllerId;
use std::cell::RefCell;
use std::rc::Rc;

/// One vibration pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VibrationRequest {
    /// Controller to pulse; `None` targets the device itself (phone/headset).
    pub controller: Option<ControllerId>,
    /// Pulse length in milliseconds.
    pub duration_ms: u32,
}

/// Haptic output device.
///
/// Implementations must not fail loudly: platforms without vibration
/// support return `false` and do nothing.
pub trait Haptics {
    /// Request a pulse. Returns whether the platform accepted it.
    fn vibrate(&mut self, request: VibrationRequest) -> bool;
}

/// Haptics for platforms without vibration support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&mut self, _request: VibrationRequest) -> bool {
        false
    }
}

/// Records every request; clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingHaptics {
    log: Rc<RefCell<Vec<VibrationRequest>>>,
}

impl RecordingHaptics {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<VibrationRequest> {
        self.log.borrow().clone()
    }
}

impl Haptics for RecordingHaptics {
    fn vibrate(&mut self, request: VibrationRequest) -> bool {
        self.log.borrow_mut().push(request);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_haptics_declines() {
        let mut haptics = NoHaptics;
        assert!(!haptics.vibrate(VibrationRequest {
            controller: None,
            duration_ms: 50,
        }));
    }

    #[test]
    fn recorder_clones_share_log() {
        let recorder = RecordingHaptics::new();
        let mut boxed: Box<dyn Haptics> = Box::new(recorder.clone());
        boxed.vibrate(VibrationRequest {
            controller: Some(ControllerId(0)),
            duration_ms: 100,
        });
        assert_eq!(recorder.requests().len(), 1);
        assert_eq!(recorder.requests()[0].duration_ms, 100);
    }
}
