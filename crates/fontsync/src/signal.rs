//! Single-threaded change notification.
//!
//! A [`Signal`] holds listeners and calls them synchronously on
//! [`Signal::emit`]. Listeners may connect, disconnect or emit again while an
//! emission is running: the listener list is snapshotted first, and a
//! listener removed mid-emission is skipped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<E> = Rc<dyn Fn(&E)>;

struct Slots<E> {
    next_id: u64,
    listeners: Vec<(u64, Listener<E>)>,
}

pub struct Signal<E> {
    slots: Rc<RefCell<Slots<E>>>,
}

impl<E> Clone for Signal<E> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<E: 'static> Default for Signal<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> Signal<E> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Registers a listener. It stays connected until the returned
    /// [`Subscription`] is cancelled or dropped.
    pub fn connect<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&E) + 'static,
    {
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            let listener: Listener<E> = Rc::new(listener);
            slots.listeners.push((id, listener));
            id
        };
        let slots: Weak<RefCell<Slots<E>>> = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = slots.upgrade() {
                slots.borrow_mut().listeners.retain(|(i, _)| *i != id);
            }
        })
    }

    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(u64, Listener<E>)> = self.slots.borrow().listeners.clone();
        for (id, listener) in snapshot {
            let connected = self.slots.borrow().listeners.iter().any(|(i, _)| *i == id);
            if connected {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.slots.borrow().listeners.len()
    }

    /// Disconnects every listener.
    pub fn clear(&self) {
        self.slots.borrow_mut().listeners.clear();
    }
}

/// Handle to a connected listener.
///
/// The listener is disconnected when this handle is dropped.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription that is not connected to anything.
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Disconnect the listener. Further calls do nothing.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
