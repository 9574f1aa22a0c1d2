//! Shared log of gaze callback invocations.

use reticulum_core::GazeEventKind;
use std::cell::RefCell;
use std::rc::Rc;

/// One callback invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Label the callback was created with (usually the target name).
    pub label: String,
    /// Which callback slot fired.
    pub kind: GazeEventKind,
}

/// Hands out callbacks that append to a shared log. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    log: Rc<RefCell<Vec<RecordedCall>>>,
}

impl EventRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that records `(label, kind)` each time it runs.
    pub fn callback(&self, label: &str, kind: GazeEventKind) -> impl FnMut() + 'static {
        let log = Rc::clone(&self.log);
        let label = label.to_string();
        move || {
            log.borrow_mut().push(RecordedCall {
                label: label.clone(),
                kind,
            })
        }
    }

    /// Every invocation in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.log.borrow().clone()
    }

    /// Invocations as `(label, kind)` pairs, handy for `assert_eq!`.
    pub fn sequence(&self) -> Vec<(String, GazeEventKind)> {
        self.log
            .borrow()
            .iter()
            .map(|call| (call.label.clone(), call.kind))
            .collect()
    }

    /// How often `label` received `kind`.
    pub fn count(&self, label: &str, kind: GazeEventKind) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|call| call.label == label && call.kind == kind)
            .count()
    }

    /// Whether `label` received any callback at all.
    pub fn touched(&self, label: &str) -> bool {
        self.log.borrow().iter().any(|call| call.label == label)
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_share_one_log() {
        let recorder = EventRecorder::new();
        let mut over = recorder.callback("a", GazeEventKind::Over);
        let mut long = recorder.clone().callback("a", GazeEventKind::Long);
        over();
        long();
        long();

        assert_eq!(recorder.count("a", GazeEventKind::Long), 2);
        assert_eq!(recorder.sequence()[0], ("a".to_string(), GazeEventKind::Over));
        assert!(recorder.touched("a"));
        assert!(!recorder.touched("b"));

        recorder.clear();
        assert!(recorder.calls().is_empty());
    }
}
