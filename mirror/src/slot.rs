use std::sync::{PoisonError, RwLock};

use crate::wire::{Count, Grid};

/// A single named cell holding the latest value written to it.
///
/// Writes replace the whole value; reads hand back a clone. A poisoned lock is
/// recovered rather than propagated since the stored value is always complete.
#[derive(Debug)]
pub struct Slot<T> {
    value: RwLock<Option<T>>,
}

impl<T> Slot<T> {
    pub const fn new() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }

    pub fn set(&self, value: T) {
        let mut guard = self.value.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(value);
    }

    pub fn is_set(&self) -> bool {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<T: Clone> Slot<T> {
    pub fn get(&self) -> Option<T> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide game state mirrored from the engine, one slot per quantity.
///
/// Slots are independent: nothing keeps the board consistent with the score
/// or any other slot.
#[derive(Debug, Default)]
pub struct MirrorState {
    pub board: Slot<Grid>,
    pub score: Slot<Count>,
    pub lines_cleared: Slot<Count>,
    pub level: Slot<Count>,
    pub next_tetromino: Slot<Grid>,
    pub mode: Slot<String>,
}

impl MirrorState {
    pub fn new() -> Self {
        Self::default()
    }
}
