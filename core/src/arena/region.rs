//! A single fixed-capacity slab of arena memory with a bump cursor.

use core::ptr::NonNull;
use std::alloc::{self, Layout};

use super::AllocError;

/// Alignment of every region's backing buffer.
///
/// Requests with a stricter alignment still succeed; they simply pay for
/// padding inside the region.
pub(crate) const REGION_ALIGN: usize = 16;

/// A contiguous byte buffer that is carved front to back.
///
/// `cursor` is the offset of the next free byte. It only moves forward, except
/// when [`Region::rewind`] gives back the most recent allocation.
pub(crate) struct Region {
    start: NonNull<u8>,
    layout: Layout,
    cursor: usize,
}

impl Region {
    /// Allocate a region of exactly `capacity` bytes from the system allocator.
    pub(crate) fn new(capacity: usize) -> Result<Self, AllocError> {
        let layout = Self::layout_for(capacity)?;
        // SAFETY: `layout_for` never produces a zero-sized layout.
        let ptr = unsafe { alloc::alloc(layout) };
        let start = NonNull::new(ptr).ok_or(AllocError::OutOfMemory { layout })?;
        Ok(Self {
            start,
            layout,
            cursor: 0,
        })
    }

    /// The layout used to back a region of `capacity` bytes.
    pub(crate) fn layout_for(capacity: usize) -> Result<Layout, AllocError> {
        Layout::from_size_align(capacity.max(1), REGION_ALIGN)
            .map_err(|_| AllocError::CapacityOverflow { size: capacity })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub(crate) fn start(&self) -> NonNull<u8> {
        self.start
    }

    /// Bytes left between the cursor and the end of the buffer.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.capacity() - self.cursor
    }

    /// Carve `layout` out of this region, or return `None` if it does not fit.
    pub(crate) fn try_bump(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        let base = self.start.as_ptr().addr();
        let current = base.checked_add(self.cursor)?;
        let mask = layout.align() - 1;
        let aligned = current.checked_add(mask)? & !mask;
        let offset = aligned - base;
        let end = offset.checked_add(layout.size())?;
        if end > self.capacity() {
            return None;
        }

        self.cursor = end;
        // SAFETY: `offset <= end <= capacity`, so the pointer stays inside the buffer
        // (or one past its end for a zero-sized request).
        Some(unsafe { NonNull::new_unchecked(self.start.as_ptr().add(offset)) })
    }

    /// Whether `ptr` points into this region's buffer.
    #[inline]
    pub(crate) fn contains(&self, ptr: NonNull<u8>) -> bool {
        let base = self.start().as_ptr().addr();
        let addr = ptr.as_ptr().addr();
        addr >= base && addr < base + self.capacity()
    }

    /// Whether the `size` bytes at `ptr` end exactly at the cursor.
    #[inline]
    pub(crate) fn is_last(&self, ptr: NonNull<u8>, size: usize) -> bool {
        self.contains(ptr) && ptr.as_ptr().addr() + size == self.start.as_ptr().addr() + self.cursor
    }

    /// Move the cursor back by `size` bytes.
    pub(crate) fn rewind(&mut self, size: usize) {
        debug_assert!(size <= self.cursor, "rewind past the start of the region");
        self.cursor -= size;
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        // SAFETY: `start` was returned by `alloc::alloc` with exactly this layout.
        unsafe { alloc::dealloc(self.start.as_ptr(), self.layout) }
    }
}
