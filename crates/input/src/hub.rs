//! Injectable input-event source.
//!
//! The host owns an [`InputHub`] and dispatches translated events into it.
//! Consumers subscribe and drain their own queue once per frame. Dropping (or
//! cancelling) an [`InputSubscription`] detaches it from the hub, so a torn-down
//! scene leaves no listener behind.

use crate::InputEvent;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Queue = Rc<RefCell<VecDeque<InputEvent>>>;

#[derive(Debug, Default)]
struct HubState {
    next_id: u64,
    listeners: Vec<(u64, Queue)>,
}

/// Fan-out point for input events. Cheap to clone; clones share listeners.
#[derive(Debug, Clone, Default)]
pub struct InputHub {
    state: Rc<RefCell<HubState>>,
}

impl InputHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener.
    pub fn subscribe(&self) -> InputSubscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let queue: Queue = Rc::default();
        state.listeners.push((id, Rc::clone(&queue)));
        tracing::debug!(listener = id, "input listener attached");
        InputSubscription {
            id,
            queue,
            hub: Rc::downgrade(&self.state),
        }
    }

    /// Deliver an event to every live listener.
    pub fn dispatch(&self, event: InputEvent) {
        for (_, queue) in &self.state.borrow().listeners {
            queue.borrow_mut().push_back(event);
        }
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

/// A listener's handle on the hub. Detaches on drop.
#[derive(Debug)]
pub struct InputSubscription {
    id: u64,
    queue: Queue,
    hub: Weak<RefCell<HubState>>,
}

impl InputSubscription {
    /// Take all pending events in arrival order.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    /// Whether any events are waiting.
    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().is_empty()
    }

    /// Detach explicitly. Equivalent to dropping the subscription.
    pub fn cancel(self) {}

    fn detach(&self) {
        if let Some(hub) = self.hub.upgrade() {
            let mut state = hub.borrow_mut();
            state.listeners.retain(|(id, _)| *id != self.id);
            tracing::debug!(listener = self.id, "input listener detached");
        }
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        self.detach();
    }
}
