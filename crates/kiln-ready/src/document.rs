//! The host page as seen by the bootstrap.

use crate::ready_state::ReadyState;

/// Callback invoked with the document's ready state on each change.
pub type Listener = Box<dyn FnMut(&ReadyState)>;

/// Listener registration for ready-state-change notifications.
pub trait ReadyStateEvents {
    /// Register `listener` for the lifetime of the page.
    fn add_listener(&mut self, listener: Listener);
}

/// A host page that also exposes its current ready state.
pub trait Document: ReadyStateEvents {
    /// The ready state at the time of the call.
    fn ready_state(&self) -> ReadyState;
}

/// Single-threaded in-memory page that delivers notifications in order.
pub struct MemoryDocument {
    state: ReadyState,
    listeners: Vec<Listener>,
}

impl MemoryDocument {
    /// A page that has just started loading.
    pub fn new() -> Self {
        Self::with_state(ReadyState::Loading)
    }

    /// A page already at `state`, e.g. one that finished loading before any
    /// script attached.
    pub fn with_state(state: ReadyState) -> Self {
        Self {
            state,
            listeners: Vec::new(),
        }
    }

    /// Move the page to `state` and notify every listener in registration
    /// order.
    pub fn set_ready_state(&mut self, state: impl Into<ReadyState>) {
        self.state = state.into();
        tracing::trace!(state = %self.state, "readystatechange");
        for listener in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadyStateEvents for MemoryDocument {
    fn add_listener(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }
}

impl Document for MemoryDocument {
    fn ready_state(&self) -> ReadyState {
        self.state.clone()
    }
}
