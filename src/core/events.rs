//! Observer lists with deterministic synchronous dispatch.
//!
//! Semantics:
//! - Observers run synchronously, in registration order.
//! - The entry list is snapshotted before a dispatch, so observers may
//!   subscribe or unsubscribe from inside a callback without perturbing the
//!   current delivery.
//! - An observer must not re-dispatch into itself recursively; each callback
//!   cell is exclusively borrowed for the duration of its call.

use std::cell::RefCell;
use std::rc::Rc;

/// Stable identifier for a subscription on one observer list.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Returns the raw numeric identifier.
    pub fn raw(self) -> u64 {
        self.0
    }
}

type Callback<C, E> = Rc<RefCell<Box<dyn FnMut(&C, &E)>>>;

struct Entry<C, E> {
    id: ObserverId,
    callback: Callback<C, E>,
}

/// Registration-ordered observer list for events of type `E` about `C`.
pub struct Observers<C, E> {
    entries: Vec<Entry<C, E>>,
    next_id: u64,
}

impl<C, E> Default for Observers<C, E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<C, E> Observers<C, E> {
    pub fn subscribe(&mut self, callback: Box<dyn FnMut(&C, &E)>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deliver `event` to every observer subscribed at the time of the call.
pub(crate) fn dispatch<C, E>(observers: &Rc<RefCell<Observers<C, E>>>, context: &C, event: &E) {
    let snapshot: Vec<Callback<C, E>> = observers
        .borrow()
        .entries
        .iter()
        .map(|entry| Rc::clone(&entry.callback))
        .collect();
    for callback in snapshot {
        (&mut *callback.borrow_mut())(context, event);
    }
}
