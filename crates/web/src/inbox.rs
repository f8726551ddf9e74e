//! Events raised by the page and the widget, queued until the facade is free.
//!
//! The widget may call back synchronously from inside a cart call, while the
//! facade is still busy with the action that made the call. Such events wait
//! here and are handled, in arrival order, once the action returns.

use std::collections::VecDeque;

use popup_demo_core::{CheckoutWidget, Integration, OrderReference, Page};
use serde_json::Value;

/// Something the browser reported.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Data callback payload.
    Data(Value),
    PopupClosed(OrderReference),
    ScriptLoaded,
    ScriptFailed,
    /// A deferred tick requested by the facade.
    Tick,
}

impl HostEvent {
    /// Hand the event to the facade.
    pub fn apply<W: CheckoutWidget, P: Page>(self, facade: &mut Integration<W, P>) {
        match self {
            Self::Data(payload) => facade.on_callback(&payload),
            Self::PopupClosed(order) => facade.on_popup_closed(&order),
            Self::ScriptLoaded => facade.on_script_loaded(),
            Self::ScriptFailed => facade.on_script_failed(),
            Self::Tick => facade.tick(),
        }
    }

    /// Whether handling the event can change what the page shows.
    #[must_use]
    pub const fn changes_view(&self) -> bool {
        !matches!(self, Self::Tick)
    }
}

/// FIFO of events waiting for the facade.
#[derive(Debug, Clone)]
pub struct Inbox<T = HostEvent> {
    queue: VecDeque<T>,
}

impl<T> Default for Inbox<T> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<T> Inbox<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: T) {
        self.queue.push_back(event);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
