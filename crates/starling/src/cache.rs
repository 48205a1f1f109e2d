//
// cache.rs
//
// Per-scope memoization store with a known-absent sentinel
//

use std::cell::RefCell;
use std::collections::HashMap;

/// Named-slot memoization store.
///
/// A slot holds either a computed value or the known-absent marker (`None`),
/// so a factory that produced nothing is not re-run until the next
/// invalidation. `clear` drops all slots atomically.
///
/// Not thread-safe: interior mutability is `RefCell`, per the core's
/// single-threaded model. External synchronization is the owner's
/// responsibility.
#[derive(Debug)]
pub struct Cache<V> {
    slots: RefCell<HashMap<String, Option<V>>>,
}

impl<V> Default for Cache<V> {
    fn default() -> Self {
        Self {
            slots: RefCell::new(HashMap::new()),
        }
    }
}

impl<V: Clone> Cache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the slot's stored value, or run `factory`, store its result
    /// (including the known-absent marker), and return it.
    ///
    /// The factory runs outside the internal borrow, so it may itself read
    /// other slots of this cache.
    pub fn get_or_add(&self, slot: &str, factory: impl FnOnce() -> Option<V>) -> Option<V> {
        if let Some(stored) = self.slots.borrow().get(slot) {
            return stored.clone();
        }
        let value = factory();
        self.slots
            .borrow_mut()
            .insert(slot.to_string(), value.clone());
        value
    }

    /// Read a slot without populating it. Outer `None` means the slot has
    /// never been computed; `Some(None)` is the known-absent marker.
    pub fn get(&self, slot: &str) -> Option<Option<V>> {
        self.slots.borrow().get(slot).cloned()
    }

    /// Drop all slots.
    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}
