//! ArenaVec: an append-only growable array backed by an [`Arena`].
//!
//! ArenaVec provides:
//! - Storage carved from the arena through [`Arena::realloc`], never from the heap
//! - Capacity that only grows, by doubling from a small nonzero floor
//! - Insertion order preserved across any number of growth events
//!
//! Elements are `Copy`: the arena never runs destructors, so nothing that needs
//! one may live in it.

use core::alloc::Layout;
use core::fmt;
use core::ops::Deref;
use core::ptr::{self, NonNull};

use crate::arena::{Arena, AllocError, handle_alloc_failure};

/// Capacity of the first buffer allocated for an empty array.
const MIN_NON_ZERO_CAP: usize = 4;

pub struct ArenaVec<'a, T> {
    arena: &'a Arena,
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
}

impl<'a, T: Copy> ArenaVec<'a, T> {
    /// Create an empty array. Nothing is allocated until the first push.
    pub fn new_in(arena: &'a Arena) -> Self {
        Self {
            arena,
            ptr: NonNull::dangling(),
            len: 0,
            // Zero-sized elements never need storage.
            cap: if size_of::<T>() == 0 { usize::MAX } else { 0 },
        }
    }

    /// Create an empty array with room for at least `capacity` elements.
    pub fn with_capacity_in(capacity: usize, arena: &'a Arena) -> Self {
        let mut vec = Self::new_in(arena);
        if capacity > vec.cap {
            vec.grow(capacity);
        }
        vec
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Append `value` at the end, growing the buffer when it is full.
    pub fn push(&mut self, value: T) {
        if self.len == self.cap {
            self.reserve_one_unchecked();
        }
        // SAFETY: `len < cap`, so the slot is inside the buffer and unused.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Append every element of `values`, in order.
    ///
    /// Same result as pushing them one by one; the buffer is grown up front
    /// instead of element by element.
    pub fn extend_from_slice(&mut self, values: &[T]) {
        self.reserve(values.len());
        // SAFETY: `reserve` made room for `values.len()` more elements, and the
        // source cannot alias our buffer while we hold `&mut self`.
        unsafe {
            ptr::copy_nonoverlapping(
                values.as_ptr(),
                self.ptr.as_ptr().add(self.len),
                values.len(),
            );
        }
        self.len += values.len();
    }

    /// Make room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        let required = self
            .len
            .checked_add(additional)
            .unwrap_or_else(|| capacity_overflow(usize::MAX));
        if required <= self.cap {
            return;
        }
        let mut new_cap = self.next_capacity();
        while new_cap < required {
            new_cap = new_cap
                .checked_mul(2)
                .unwrap_or_else(|| capacity_overflow(new_cap));
        }
        self.grow(new_cap);
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized; `ptr` is dangling only
        // while `len == 0` (or for zero-sized `T`), which is valid for slices.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Turn the array into a slice that lives as long as the arena.
    pub fn into_arena_slice(self) -> &'a [T] {
        // SAFETY: the buffer belongs to the arena and is never reallocated again
        // once `self` is consumed.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[cold]
    fn reserve_one_unchecked(&mut self) {
        debug_assert_eq!(self.len, self.cap);
        let new_cap = self.next_capacity();
        self.grow(new_cap);
    }

    /// Double the current capacity, starting from the floor when empty.
    fn next_capacity(&self) -> usize {
        self.cap
            .checked_mul(2)
            .unwrap_or_else(|| capacity_overflow(self.cap))
            .max(MIN_NON_ZERO_CAP)
    }

    fn grow(&mut self, new_cap: usize) {
        debug_assert!(new_cap > self.cap);
        let old_layout = array_layout::<T>(self.cap);
        let new_layout = array_layout::<T>(new_cap);

        // SAFETY: `ptr` was returned by `arena` for `old_layout` (or is dangling with
        // a zero-sized `old_layout`), and the old buffer is forgotten right here.
        let new_ptr = unsafe { self.arena.realloc(self.ptr.cast(), old_layout, new_layout.size()) }
            .unwrap_or_else(|err| handle_alloc_failure(err));

        tracing::trace!(old_cap = self.cap, new_cap, len = self.len, "ArenaVec grew");
        self.ptr = new_ptr.cast();
        self.cap = new_cap;
    }
}

fn array_layout<T>(cap: usize) -> Layout {
    Layout::array::<T>(cap).unwrap_or_else(|_| capacity_overflow(cap))
}

#[cold]
fn capacity_overflow(cap: usize) -> ! {
    handle_alloc_failure(AllocError::CapacityOverflow {
        size: cap.saturating_mul(size_of::<usize>()),
    })
}

impl<T: Copy> Deref for ArenaVec<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<'v, T: Copy> IntoIterator for &'v ArenaVec<'_, T> {
    type Item = &'v T;
    type IntoIter = core::slice::Iter<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for ArenaVec<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Copy + PartialEq> PartialEq<[T]> for ArenaVec<'_, T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}
