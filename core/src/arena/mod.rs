//! Region-chained bump allocator.
//!
//! The [`Arena`] owns a chain of fixed-capacity regions and hands out byte ranges
//! carved from them. Individual allocations are never freed; the whole chain is
//! released at once by [`Arena::clean`] (or on drop). This trades peak memory for
//! trivial ownership, which suits a short-lived interpreter process.
//!
//! Allocation scans the chain from the head and carves from the first region with
//! room. When no region fits, a new one sized by [`Arena::region_size_for`] is
//! appended to the tail.
//!
//! [`Arena::realloc`] always copies into a fresh block. Afterwards, if the old block
//! was the most recent allocation in its region, the region's cursor is rewound so
//! the next allocation there reuses the space. Nothing else is ever reclaimed.
//!
//! ## Example
//!
//! ```
//! use kiln_core::arena::Arena;
//!
//! let arena = Arena::new();
//! let greeting = arena.alloc_str("hello");
//! let numbers = arena.alloc_slice_copy(&[1, 2, 3]);
//! assert_eq!(greeting, "hello");
//! assert_eq!(numbers, &[1, 2, 3]);
//! ```

mod region;


use core::cell::RefCell;
use core::fmt;
use core::ptr::{self, NonNull};
use std::alloc::{self, Layout};

use thiserror::Error;

use crate::options::ArenaOptions;
use region::{REGION_ALIGN, Region};

/// Failure to obtain backing memory for an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The system allocator refused to back a new region.
    #[error("out of memory allocating a {} byte region", .layout.size())]
    OutOfMemory { layout: Layout },

    /// The requested size cannot be represented as a valid layout.
    #[error("allocation of {size} bytes overflows the address space")]
    CapacityOverflow { size: usize },
}

/// Snapshot of how much memory an arena holds and uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaStats {
    /// Number of regions in the chain.
    pub regions: usize,
    /// Total bytes of backing memory across all regions.
    pub capacity: usize,
    /// Bytes consumed by allocations (including alignment padding).
    pub used: usize,
}

/// A region-chained bump allocator.
///
/// Regions are kept in chain order: the head is the first element and each
/// region's successor is the one after it. Region buffers never move, so
/// references handed out by the arena stay valid for as long as the arena lives.
///
/// The arena is single-threaded: it uses interior mutability and is neither
/// `Send` nor `Sync`.
pub struct Arena {
    options: ArenaOptions,
    regions: RefCell<Vec<Region>>,
}

impl Arena {
    /// Create an arena with one region of the default capacity.
    pub fn new() -> Self {
        Self::with_options(ArenaOptions::default())
    }

    /// Create an arena whose first region holds at least `minimum_size` bytes.
    pub fn with_capacity(minimum_size: usize) -> Self {
        Self::create(ArenaOptions::default(), minimum_size)
    }

    /// Create an arena with custom options.
    pub fn with_options(options: ArenaOptions) -> Self {
        Self::create(options, 0)
    }

    fn create(options: ArenaOptions, minimum_size: usize) -> Self {
        let size = region_size(&options, minimum_size);
        // Running without memory is not an option: abort like `Vec` does.
        let head = Region::new(size).unwrap_or_else(|err| handle_alloc_failure(err));
        tracing::debug!(capacity = head.capacity(), "arena created");
        Self {
            options,
            regions: RefCell::new(vec![head]),
        }
    }

    /// Size of a new region able to hold a request of `size` bytes.
    ///
    /// Regions are never smaller than the configured default capacity; a larger
    /// request gets a region of exactly its own size.
    pub fn region_size_for(&self, size: usize) -> usize {
        region_size(&self.options, size)
    }

    /// Allocate a block for `layout`, growing the chain if needed.
    ///
    /// Fails only when the system allocator cannot back a new region.
    pub fn try_alloc(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let mut regions = self.regions.borrow_mut();
        for region in regions.iter_mut() {
            if let Some(ptr) = region.try_bump(layout) {
                return Ok(ptr);
            }
        }

        // Fresh regions are REGION_ALIGN-aligned; stricter alignments need room to pad.
        let padding = layout.align().saturating_sub(REGION_ALIGN);
        let request = layout
            .size()
            .checked_add(padding)
            .ok_or(AllocError::CapacityOverflow { size: layout.size() })?;
        let mut region = Region::new(self.region_size_for(request))?;
        let ptr = region
            .try_bump(layout)
            .ok_or(AllocError::CapacityOverflow { size: layout.size() })?;

        tracing::trace!(
            size = layout.size(),
            capacity = region.capacity(),
            regions = regions.len() + 1,
            "arena grew"
        );
        regions.push(region);
        Ok(ptr)
    }

    /// Allocate a block for `layout`, aborting the process on memory exhaustion.
    pub fn alloc_layout(&self, layout: Layout) -> NonNull<u8> {
        self.try_alloc(layout).unwrap_or_else(|err| handle_alloc_failure(err))
    }

    /// Move `value` into the arena and return a reference to it.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc<T: Copy>(&self, value: T) -> &mut T {
        let ptr = self.alloc_layout(Layout::new::<T>()).cast::<T>();
        // SAFETY: the block is fresh, properly aligned and sized for `T`.
        unsafe {
            ptr.as_ptr().write(value);
            &mut *ptr.as_ptr()
        }
    }

    /// Copy `src` into the arena.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> &mut [T] {
        let layout = Layout::for_value(src);
        let dst = self.alloc_layout(layout).cast::<T>();
        // SAFETY: the block is fresh, aligned for `T` and holds `src.len()` elements.
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), dst.as_ptr(), src.len());
            core::slice::from_raw_parts_mut(dst.as_ptr(), src.len())
        }
    }

    /// Copy a string into the arena.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_str(&self, src: &str) -> &mut str {
        let bytes = self.alloc_slice_copy(src.as_bytes());
        // SAFETY: the bytes were copied verbatim from a valid `str`.
        unsafe { core::str::from_utf8_unchecked_mut(bytes) }
    }

    /// Copying reallocation.
    ///
    /// Allocates a fresh block of `new_size` bytes (aligned like `old`), copies
    /// `min(old.size(), new_size)` bytes from `ptr`, then reclaims the old block if
    /// it was the most recent allocation of its region: that region's cursor is
    /// rewound by `old.size()`, so the next allocation carved from it starts where
    /// the old block started.
    ///
    /// # Safety
    ///
    /// - `ptr` must have been returned by this arena for a block described by `old`
    ///   (a zero-sized `old` is accepted with any well-aligned `ptr`).
    /// - The caller must not use the old block, or any reference derived from it,
    ///   after this call: its bytes may be handed out again.
    pub unsafe fn realloc(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        let new_layout = Layout::from_size_align(new_size, old.align())
            .map_err(|_| AllocError::CapacityOverflow { size: new_size })?;
        let new_ptr = self.try_alloc(new_layout)?;

        let copied = old.size().min(new_size);
        if copied > 0 {
            // SAFETY: the old block is still reserved while the new one is carved,
            // so the two ranges cannot overlap.
            unsafe { ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr(), copied) };
        }

        if old.size() > 0 {
            self.reclaim(ptr, old.size());
        }
        Ok(new_ptr)
    }

    /// Rewind the owning region's cursor if `ptr..ptr + size` is its last allocation.
    fn reclaim(&self, ptr: NonNull<u8>, size: usize) -> bool {
        let mut regions = self.regions.borrow_mut();
        let Some(region) = regions.iter_mut().find(|region| region.contains(ptr)) else {
            return false;
        };
        if !region.is_last(ptr, size) {
            return false;
        }
        region.rewind(size);
        tracing::trace!(size, cursor = region.cursor(), "arena reclaimed block");
        true
    }

    /// Number of regions currently in the chain.
    pub fn region_count(&self) -> usize {
        self.regions.borrow().len()
    }

    /// Bytes still free in each region, in chain order.
    pub fn remaining(&self) -> Vec<usize> {
        self.regions.borrow().iter().map(Region::remaining).collect()
    }

    pub fn stats(&self) -> ArenaStats {
        let regions = self.regions.borrow();
        ArenaStats {
            regions: regions.len(),
            capacity: regions.iter().map(Region::capacity).sum(),
            used: regions.iter().map(Region::cursor).sum(),
        }
    }

    /// Release every region.
    ///
    /// Consumes the arena, so no allocation can outlive this call.
    pub fn clean(self) {
        let stats = self.stats();
        tracing::debug!(
            regions = stats.regions,
            capacity = stats.capacity,
            used = stats.used,
            "arena released"
        );
        drop(self);
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("options", &self.options)
            .field("stats", &self.stats())
            .finish()
    }
}

fn region_size(options: &ArenaOptions, request: usize) -> usize {
    request.max(options.default_region_capacity)
}

/// Abort the process on an allocation failure, the way `Vec` does.
#[cold]
pub(crate) fn handle_alloc_failure(err: AllocError) -> ! {
    match err {
        AllocError::OutOfMemory { layout } => alloc::handle_alloc_error(layout),
        AllocError::CapacityOverflow { size } => panic!("arena capacity overflow ({size} bytes)"),
    }
}
