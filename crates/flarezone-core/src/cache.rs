//! Memoized values with explicit invalidation
//!
//! A [`Cached`] slot is owned by the entity whose lazily fetched state it
//! holds (an account's zone list, a zone's record index). Children that can
//! make that state stale get a [`CacheHandle`]: a non-owning link to the slot
//! that can only clear it.

use crate::error::Result;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Lazily initialized value that stays cached until invalidated
pub struct Cached<T> {
    slot: Rc<RefCell<Option<T>>>,
}

impl<T: Clone + 'static> Cached<T> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    /// Create a slot that already holds `value`
    pub fn seeded(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(value))),
        }
    }

    /// Return the cached value, running `init` to fill the slot if empty
    ///
    /// A failing `init` leaves the slot empty. No borrow is held while `init`
    /// runs, so it may freely construct children holding handles to this slot.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.slot.borrow().as_ref() {
            return Ok(value.clone());
        }

        let value = init()?;
        *self.slot.borrow_mut() = Some(value.clone());
        Ok(value)
    }

    /// Non-owning handle that can invalidate this slot
    pub fn handle(&self) -> CacheHandle {
        let slot: Weak<RefCell<Option<T>>> = Rc::downgrade(&self.slot);
        CacheHandle { slot }
    }
}

impl<T> Cached<T> {
    /// Whether the slot currently holds a value
    pub fn is_cached(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Drop the cached value; the next access re-initializes
    pub fn invalidate(&self) {
        let _stale = self.slot.replace(None);
    }
}

impl<T: Clone + 'static> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Cached<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cached")
            .field("cached", &self.is_cached())
            .finish()
    }
}

trait Invalidate {
    fn invalidate(&self);
}

impl<T> Invalidate for RefCell<Option<T>> {
    fn invalidate(&self) {
        let _stale = self.replace(None);
    }
}

/// Non-owning link to a parent's [`Cached`] slot
///
/// Invalidating through a handle whose slot has been dropped is a no-op.
#[derive(Clone)]
pub struct CacheHandle {
    slot: Weak<dyn Invalidate>,
}

impl CacheHandle {
    /// Clear the linked slot
    pub fn invalidate(&self) {
        if let Some(slot) = self.slot.upgrade() {
            slot.invalidate();
        }
    }

    /// Whether the linked slot is still alive
    pub fn is_live(&self) -> bool {
        self.slot.strong_count() > 0
    }
}

impl std::fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheHandle")
            .field("live", &self.is_live())
            .finish()
    }
}
