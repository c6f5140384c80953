//! Subscriber registries for game events
//!
//! [`Listeners`] is a token-keyed list of callbacks notified in subscription
//! order. [`StatusBus`] uses it to broadcast terminal states; the opponent
//! move relay uses it for refresh notifications.
//!
//! # Tokens
//!
//! `subscribe` returns a [`SubscriptionId`]. Passing it to `unsubscribe`
//! removes exactly that callback. Ids are never reused within a registry.

use crate::game::resources::TerminalState;
use crate::game::types::Color;
use tracing::debug;

/// Opaque handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Ordered set of boxed callbacks
pub struct Listeners<F: ?Sized> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<F>)>,
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> Listeners<F> {
    pub fn subscribe(&mut self, callback: Box<F>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    /// Remove a callback; `false` if the token was unknown or already removed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Callbacks in subscription order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<F>> {
        self.entries.iter_mut().map(|(_, callback)| callback)
    }
}

/// Callback receiving the terminal state and the side to move next
pub type StatusListener = dyn FnMut(TerminalState, Color);

/// Publish/subscribe bus for game-over transitions
///
/// # Usage
///
/// ```rust,ignore
/// let token = bus.subscribe(move |state, to_move_next| {
///     let status = GameStatus::attribute(state, to_move_next, my_color);
///     show_banner(status.message());
/// });
/// bus.unsubscribe(token);
/// ```
#[derive(Default)]
pub struct StatusBus {
    listeners: Listeners<StatusListener>,
}

impl StatusBus {
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(TerminalState, Color) + 'static,
    {
        self.listeners.subscribe(Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Notify every subscriber synchronously, oldest first
    pub fn broadcast(&mut self, state: TerminalState, to_move_next: Color) {
        debug!(
            "[STATUS] Broadcasting {:?} to {} subscriber(s)",
            state,
            self.listeners.len()
        );
        for listener in self.listeners.iter_mut() {
            listener(state, to_move_next);
        }
    }
}
