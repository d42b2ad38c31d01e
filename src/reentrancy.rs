//! Debug-only reentrancy guard.
//!
//! The dictionary invokes user code (`K: Eq`/`K: Hash`) while probing
//! buckets. If that user code re-enters the same dictionary, internals could
//! be observed mid-mutation. In debug builds the guard panics on nested
//! entry; in release builds it compiles away entirely.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-instance reentrancy tracker. Embedded in the dictionary and checked
/// at the top of every public operation with `let _g = self.reentrancy.enter();`.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
    // Keep !Send + !Sync in line with the single-threaded contract.
    _nosend: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    /// Create a new tracker. Const so it can initialize a struct field.
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
            _nosend: PhantomData,
        }
    }

    /// Enter a guarded section. Panics in debug builds if already entered.
    #[inline]
    pub fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                self.depth.get() == 0,
                "reentrancy detected: nested entry into ChainDict"
            );
            self.depth.set(self.depth.get() + 1);
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentrancyGuard { _z: PhantomData };
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::enter`.
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl<'a> Drop for ReentrancyGuard<'a> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.owner.depth.get();
            debug_assert!(d > 0);
            self.owner.depth.set(d - 1);
        }
    }
}
