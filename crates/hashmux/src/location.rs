// File: src/location.rs
// Purpose: Host collaborators for reading, writing and observing the URL hash

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::path::to_hash;

/// Access to the active URL hash of the host
///
/// Hashes are exchanged in location form, with the leading `#`
/// (`"#/users/42?tab=info"`), or empty when the URL carries no fragment.
pub trait Location {
    /// Current hash
    fn current(&self) -> String;

    /// Navigates to `hash`, creating a history entry and raising a
    /// navigation event in the host
    fn assign(&self, hash: &str);

    /// Replaces the current history entry with `hash` without raising a
    /// navigation event
    fn replace(&self, hash: &str);
}

/// Source of host navigation events
pub trait ChangeSource {
    /// Consumes one pending navigation event, returning `false` when none is
    /// pending
    fn take_change(&self) -> bool;
}

impl<T: Location + ?Sized> Location for Rc<T> {
    fn current(&self) -> String {
        (**self).current()
    }

    fn assign(&self, hash: &str) {
        (**self).assign(hash)
    }

    fn replace(&self, hash: &str) {
        (**self).replace(hash)
    }
}

impl<T: ChangeSource + ?Sized> ChangeSource for Rc<T> {
    fn take_change(&self) -> bool {
        (**self).take_change()
    }
}

/// In-memory host for headless use and tests
///
/// Behaves like a browser location: assigning a different hash pushes a
/// history entry and queues one navigation event, assigning the current hash
/// does nothing, and replacing never queues an event.
///
/// # Examples
///
/// ```
/// use hashmux::location::{ChangeSource, Location, MemoryLocation};
///
/// let location = MemoryLocation::new("#/");
/// location.navigate("/users/42");
///
/// assert_eq!(location.current(), "#/users/42");
/// assert!(location.take_change());
/// assert!(!location.take_change());
/// ```
#[derive(Debug, Default)]
pub struct MemoryLocation {
    hash: RefCell<String>,
    history: RefCell<Vec<String>>,
    pending: Cell<usize>,
}

impl MemoryLocation {
    /// Creates a location showing `initial`; an empty string means no hash
    pub fn new(initial: &str) -> Self {
        let hash = if initial.is_empty() {
            String::new()
        } else {
            to_hash(initial)
        };
        Self {
            history: RefCell::new(vec![hash.clone()]),
            hash: RefCell::new(hash),
            pending: Cell::new(0),
        }
    }

    /// Simulates the user navigating to `fragment` (with or without `#`)
    pub fn navigate(&self, fragment: &str) {
        self.assign(&to_hash(fragment));
    }

    /// History entries, oldest first, ending with the current hash
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    /// Number of navigation events not yet consumed
    pub fn pending_changes(&self) -> usize {
        self.pending.get()
    }
}

impl Location for MemoryLocation {
    fn current(&self) -> String {
        self.hash.borrow().clone()
    }

    fn assign(&self, hash: &str) {
        if *self.hash.borrow() == hash {
            return;
        }
        *self.hash.borrow_mut() = hash.to_string();
        self.history.borrow_mut().push(hash.to_string());
        self.pending.set(self.pending.get() + 1);
    }

    fn replace(&self, hash: &str) {
        *self.hash.borrow_mut() = hash.to_string();
        if let Some(last) = self.history.borrow_mut().last_mut() {
            *last = hash.to_string();
        }
    }
}

impl ChangeSource for MemoryLocation {
    fn take_change(&self) -> bool {
        match self.pending.get() {
            0 => false,
            n => {
                self.pending.set(n - 1);
                true
            }
        }
    }
}
