//! The page-ready bootstrap.

use crate::document::{Document, ReadyStateEvents};
use crate::indicator::Indicator;
use crate::ready_state::ReadyState;

/// Flips the injected [`Indicator`] to available once the document reaches
/// [`ReadyState::Complete`].
pub struct PageReadyBootstrap<I> {
    indicator: I,
    initialized: bool,
}

impl<I: Indicator> PageReadyBootstrap<I> {
    /// Create a bootstrap that will update `indicator`.
    pub fn new(indicator: I) -> Self {
        Self {
            indicator,
            initialized: false,
        }
    }

    /// Listener body: initialize if and only if `state` is `complete`.
    pub fn on_ready_state_change(&mut self, state: &ReadyState) {
        if state.is_complete() {
            self.init();
        } else {
            tracing::trace!(%state, "document not complete yet");
        }
    }

    /// Set the indicator to available. Calling this again has no further
    /// effect.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.indicator.set_available();
        tracing::debug!("page ready, indicator set to available");
    }

    /// Whether [`init`](Self::init) has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The injected indicator.
    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}

impl<I: Indicator + 'static> PageReadyBootstrap<I> {
    /// Register the bootstrap as a ready-state-change listener. Only future
    /// notifications are observed; a page that is already complete never
    /// initializes through this path.
    pub fn register<E: ReadyStateEvents + ?Sized>(mut self, events: &mut E) {
        events.add_listener(Box::new(move |state| self.on_ready_state_change(state)));
    }

    /// Check the document's current state, then register for future
    /// notifications. Unlike [`register`](Self::register), this initializes a
    /// page that finished loading before the bootstrap attached.
    pub fn attach<D: Document + ?Sized>(mut self, document: &mut D) {
        let current = document.ready_state();
        self.on_ready_state_change(&current);
        self.register(document);
    }
}
