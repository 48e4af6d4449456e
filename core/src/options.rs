//! Configuration options.

/// Default capacity of a freshly created arena region, in bytes.
pub const DEFAULT_REGION_CAPACITY: usize = 8 * 1024;

/// Configuration options for an [`Arena`](crate::arena::Arena).
///
/// # Example
///
/// ```
/// use kiln_core::arena::Arena;
/// use kiln_core::options::ArenaOptions;
///
/// let arena = Arena::with_options(ArenaOptions {
///     default_region_capacity: 256,
/// });
/// assert_eq!(arena.stats().capacity, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaOptions {
    /// Capacity of every region the arena creates, unless a single request is
    /// larger, in which case that region is sized exactly to the request.
    ///
    /// Default: 8 KiB
    pub default_region_capacity: usize,
}

impl Default for ArenaOptions {
    fn default() -> Self {
        Self {
            default_region_capacity: DEFAULT_REGION_CAPACITY,
        }
    }
}
