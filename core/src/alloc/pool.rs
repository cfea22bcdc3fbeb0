//! Byte-budget accounting for a single memory pool.
//!
//! Pools do not own backing storage; they are accounting domains over the
//! host heap with a hard byte capacity. Reservation is a lock-free
//! compare-exchange loop, so the allocator built on top stays reentrant
//! from the scripting host's own memory hooks and is safe to call from
//! both execution contexts.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Identifies which pool produced a block.
///
/// Recorded per block at allocation time and never re-derived from size:
/// fallback can place an above-threshold block in the fast pool, and it
/// must be returned there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Small, always-present internal memory.
    Fast,
    /// Large, optional external memory.
    Slow,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Fast => write!(f, "fast"),
            Tier::Slow => write!(f, "slow"),
        }
    }
}

/// Lock-free byte budget for one pool.
#[derive(Debug)]
pub struct MemoryPool {
    capacity: usize,
    used: AtomicUsize,
}

impl MemoryPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            used: AtomicUsize::new(0),
        }
    }

    /// Total byte budget of this pool.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently reserved.
    pub fn used(&self) -> usize {
        self.used.load(Ordering::Relaxed)
    }

    /// Bytes still available for reservation.
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.used())
    }

    /// Reserve `size` bytes. Returns `false` without side effects when the
    /// reservation would exceed the capacity.
    pub fn try_reserve(&self, size: usize) -> bool {
        let mut used = self.used.load(Ordering::Relaxed);
        loop {
            let Some(next) = used.checked_add(size) else {
                return false;
            };
            if next > self.capacity {
                return false;
            }
            match self
                .used
                .compare_exchange_weak(used, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return true,
                Err(actual) => used = actual,
            }
        }
    }

    /// Return `size` previously reserved bytes to the pool.
    ///
    /// Callers pass exactly the size of a prior successful reservation;
    /// blocks record their size for this purpose.
    pub fn unreserve(&self, size: usize) {
        let prev = self.used.fetch_sub(size, Ordering::AcqRel);
        debug_assert!(prev >= size, "pool unreserve below zero");
    }
}
