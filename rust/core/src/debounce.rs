// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Trailing-edge debounce over a single-shot timer
//!
//! Every trigger cancels the pending timer and schedules a new one, so a
//! burst of triggers runs the action once, `delay` after the last trigger.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Quiet period before a debounced redraw fires
pub const REDRAW_DEBOUNCE: Duration = Duration::from_millis(10);

/// Single-shot timer facility
pub trait Scheduler: 'static {
    type Handle;

    /// Run `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;

    /// Cancel a scheduled task. Cancelling a task that already ran is a no-op.
    fn cancel(&self, handle: Self::Handle);
}

struct Inner<S: Scheduler> {
    scheduler: S,
    delay: Duration,
    action: Box<dyn Fn()>,
    // Kept after firing; released on the next trigger so a timer is never
    // dropped from inside its own callback.
    handle: RefCell<Option<S::Handle>>,
    armed: Cell<bool>,
}

/// Debounced action
pub struct Debounced<S: Scheduler> {
    inner: Rc<Inner<S>>,
}

impl<S: Scheduler> Clone for Debounced<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: Scheduler> Debounced<S> {
    pub fn new(scheduler: S, delay: Duration, action: impl Fn() + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                scheduler,
                delay,
                action: Box::new(action),
                handle: RefCell::new(None),
                armed: Cell::new(false),
            }),
        }
    }

    /// Restart the quiet period.
    pub fn trigger(&self) {
        self.cancel();

        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule(
            self.inner.delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    if inner.armed.replace(false) {
                        (inner.action)();
                    }
                }
            }),
        );

        *self.inner.handle.borrow_mut() = Some(handle);
        self.inner.armed.set(true);
    }

    /// Drop a pending run, if any.
    pub fn cancel(&self) {
        self.inner.armed.set(false);
        let previous = self.inner.handle.borrow_mut().take();
        if let Some(handle) = previous {
            self.inner.scheduler.cancel(handle);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner.armed.get()
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Closure that triggers this debounce, for callback registration.
    pub fn trigger_fn(&self) -> impl Fn() + 'static {
        let debounced = self.clone();
        move || debounced.trigger()
    }
}
