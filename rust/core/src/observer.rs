// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed change notifications
//!
//! Single-threaded: listeners run synchronously on the caller's thread, in
//! subscription order.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;
type ListenerList<T> = RefCell<Vec<(u64, Listener<T>)>>;

/// Broadcasts values of type `T` to subscribed listeners.
pub struct Notifier<T> {
    listeners: Rc<ListenerList<T>>,
    next_id: Rc<Cell<u64>>,
}

impl<T> Clone for Notifier<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_id: Rc::new(Cell::new(0)),
        }
    }
}

impl<T: 'static> Notifier<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the returned
    /// subscription is cancelled or the notifier is dropped.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));

        let listeners = Rc::downgrade(&self.listeners);
        Subscription {
            id,
            detach: Box::new(move |id| {
                if let Some(listeners) = Weak::upgrade(&listeners) {
                    listeners.borrow_mut().retain(|(other, _)| *other != id);
                }
            }),
        }
    }

    /// Deliver `value` to every listener.
    ///
    /// The listener list is snapshotted first, so listeners may subscribe
    /// or cancel while being notified.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(value);
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Handle returned by [`Notifier::subscribe`]
pub struct Subscription {
    id: u64,
    detach: Box<dyn Fn(u64)>,
}

impl Subscription {
    /// Remove the listener from its notifier.
    pub fn cancel(self) {
        (self.detach)(self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
