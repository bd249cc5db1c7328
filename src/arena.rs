//! Bump arena owning every AST node of one compilation.
//!
//! Storage comes from a [`bumpalo::Bump`] sized up front; the arena keeps its
//! own offset so that the configured capacity is a hard limit. Each
//! allocation pads the offset to the type's alignment and then advances it by
//! the type's size. Nothing is freed until the arena itself is dropped.

use std::alloc::Layout;
use std::cell::Cell;

use bumpalo::Bump;
use thiserror::Error;

pub const DEFAULT_ARENA_CAPACITY: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("arena exhausted: {requested} more bytes requested with {used} of {capacity} bytes in use")]
    Exhausted {
        requested: usize,
        used: usize,
        capacity: usize,
    },
}

pub struct Arena {
    bump: Bump,
    capacity: usize,
    offset: Cell<usize>,
}

impl Arena {
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            bump: Bump::with_capacity(capacity),
            capacity,
            offset: Cell::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes consumed so far, alignment padding included.
    pub fn used(&self) -> usize {
        self.offset.get()
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.used()
    }

    // advances the offset or leaves it untouched on failure
    fn reserve(&self, layout: Layout) -> Result<(), ArenaError> {
        let used = self.offset.get();
        let end = used
            .checked_next_multiple_of(layout.align())
            .and_then(|start| start.checked_add(layout.size()))
            .filter(|end| *end <= self.capacity);

        match end {
            Some(end) => {
                self.offset.set(end);
                Ok(())
            }

            None => Err(ArenaError::Exhausted {
                requested: layout.size(),
                used,
                capacity: self.capacity,
            }),
        }
    }

    /// Moves `value` into the arena. Only `Copy` types are accepted since the
    /// arena never runs destructors.
    pub fn alloc<T: Copy>(&self, value: T) -> Result<&T, ArenaError> {
        self.reserve(Layout::new::<T>())?;
        Ok(&*self.bump.alloc(value))
    }

    pub fn alloc_slice<T: Copy>(&self, items: &[T]) -> Result<&[T], ArenaError> {
        self.reserve(Layout::for_value(items))?;
        Ok(&*self.bump.alloc_slice_copy(items))
    }
}

impl Default for Arena {
    fn default() -> Self {
        Arena::with_capacity(DEFAULT_ARENA_CAPACITY)
    }
}
