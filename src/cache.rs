//! Compute-once, invalidate-on-demand value container.
//!
//! Every node keeps three of these — area, padding, position — each with an
//! independent stale flag. External code never reads the raw value; it goes
//! through the tree accessors, which recompute stale entries first.

/// A cached value plus its staleness flag. Starts stale.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    value: T,
    stale: bool,
}

impl<T: Copy + Default> Cached<T> {
    pub fn new() -> Self {
        Self {
            value: T::default(),
            stale: true,
        }
    }

    /// Whether the next access must recompute.
    #[inline]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Store a freshly computed value and clear the stale flag.
    #[inline]
    pub fn fill(&mut self, value: T) {
        self.value = value;
        self.stale = false;
    }

    /// Read the cached value. Only valid after [`fill`](Self::fill).
    #[inline]
    pub fn value(&self) -> T {
        debug_assert!(!self.stale, "read of a stale cache; use the accessor");
        self.value
    }

    /// Mark the value as needing recomputation on next access.
    #[inline]
    pub fn invalidate(&mut self) {
        self.stale = true;
    }
}

impl<T: Copy + Default> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
