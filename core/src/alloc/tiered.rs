//! Two-tier allocation with deterministic routing and origin-tracked
//! release.
//!
//! Requests at or above the configured threshold prefer the slow pool and
//! fall back to the fast pool when the slow pool is exhausted or not
//! fitted; smaller requests go straight to the fast pool. Every block
//! remembers the pool that produced it and returns its bytes there on
//! drop.

use std::sync::Arc;

use tracing::debug;

use crate::config::AllocConfig;
use crate::error::{CoreError, Result};

use super::pool::{MemoryPool, Tier};

// ---------------------------------------------------------------------------
// Pool set
// ---------------------------------------------------------------------------

/// The accounting domains shared between the allocator and every live
/// block it has produced.
#[derive(Debug)]
struct PoolSet {
    fast: MemoryPool,
    slow: Option<MemoryPool>,
}

impl PoolSet {
    fn pool(&self, tier: Tier) -> Option<&MemoryPool> {
        match tier {
            Tier::Fast => Some(&self.fast),
            Tier::Slow => self.slow.as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// OwnedBlock
// ---------------------------------------------------------------------------

/// A block of host memory charged against one pool's budget.
///
/// Dropping the block returns its bytes to the pool that produced it.
pub struct OwnedBlock {
    data: Box<[u8]>,
    tier: Tier,
    pools: Arc<PoolSet>,
}

impl OwnedBlock {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The pool this block is charged against.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Drop for OwnedBlock {
    fn drop(&mut self) {
        if let Some(pool) = self.pools.pool(self.tier) {
            pool.unreserve(self.data.len());
        }
    }
}

impl std::fmt::Debug for OwnedBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedBlock")
            .field("tier", &self.tier)
            .field("len", &self.data.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// TieredAllocator
// ---------------------------------------------------------------------------

/// Routes allocations between the fast and slow pools.
#[derive(Debug)]
pub struct TieredAllocator {
    pools: Arc<PoolSet>,
    threshold: usize,
}

impl TieredAllocator {
    pub fn new(config: &AllocConfig) -> Result<Self> {
        if config.fast_capacity == 0 {
            return Err(CoreError::Configuration(
                "fast pool capacity must be nonzero",
            ));
        }
        if config.threshold == 0 {
            return Err(CoreError::Configuration("tier threshold must be nonzero"));
        }
        Ok(Self {
            pools: Arc::new(PoolSet {
                fast: MemoryPool::new(config.fast_capacity),
                slow: config.slow_capacity.map(MemoryPool::new),
            }),
            threshold: config.threshold,
        })
    }

    /// Size at or above which requests route to the slow pool first.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Whether the board has the slow pool fitted.
    pub fn has_slow_pool(&self) -> bool {
        self.pools.slow.is_some()
    }

    /// Bytes currently reserved in `tier` (0 for an absent slow pool).
    pub fn used(&self, tier: Tier) -> usize {
        self.pools.pool(tier).map_or(0, MemoryPool::used)
    }

    /// Bytes still available in `tier` (0 for an absent slow pool).
    pub fn available(&self, tier: Tier) -> usize {
        self.pools.pool(tier).map_or(0, MemoryPool::available)
    }

    /// Allocate `size` bytes with threshold routing and slow-to-fast
    /// fallback.
    pub fn allocate(&self, size: usize) -> Result<OwnedBlock> {
        if size == 0 {
            return Err(CoreError::Validation("zero-size allocation".into()));
        }
        let tier = self.route(size)?;
        Ok(self.build_block(tier, size))
    }

    /// Allocate `size` bytes from exactly `tier`, with no fallback.
    ///
    /// The program-image loader uses this to keep images out of the fast
    /// pool: an image that silently landed in internal memory would starve
    /// the scripting host.
    pub fn allocate_pinned(&self, tier: Tier, size: usize) -> Result<OwnedBlock> {
        if size == 0 {
            return Err(CoreError::Validation("zero-size allocation".into()));
        }
        let Some(pool) = self.pools.pool(tier) else {
            return Err(CoreError::Configuration("slow pool not present"));
        };
        if !pool.try_reserve(size) {
            return Err(CoreError::ResourceExhausted {
                pool: tier,
                requested: size,
                available: pool.available(),
            });
        }
        Ok(self.build_block(tier, size))
    }

    /// Resize `block` in place. The new storage is routed by `new_size` as
    /// in [`allocate`](Self::allocate); the first `min(old, new)` bytes are
    /// preserved. On failure the original block is untouched.
    pub fn reallocate(&self, block: &mut OwnedBlock, new_size: usize) -> Result<()> {
        let mut next = self.allocate(new_size)?;
        let keep = block.len().min(new_size);
        next.bytes_mut()[..keep].copy_from_slice(&block.bytes()[..keep]);
        // The old storage drops here and its budget returns to its origin.
        *block = next;
        Ok(())
    }

    /// Return a block's bytes to the pool that produced it. Equivalent to
    /// dropping the block.
    pub fn release(&self, block: OwnedBlock) {
        drop(block);
    }

    fn route(&self, size: usize) -> Result<Tier> {
        if size >= self.threshold {
            if let Some(slow) = &self.pools.slow {
                if slow.try_reserve(size) {
                    return Ok(Tier::Slow);
                }
                debug!(size, "slow pool exhausted, falling back to fast pool");
            }
            if self.pools.fast.try_reserve(size) {
                return Ok(Tier::Fast);
            }
        } else if self.pools.fast.try_reserve(size) {
            return Ok(Tier::Fast);
        }
        Err(CoreError::ResourceExhausted {
            pool: Tier::Fast,
            requested: size,
            available: self.pools.fast.available(),
        })
    }

    fn build_block(&self, tier: Tier, size: usize) -> OwnedBlock {
        OwnedBlock {
            data: vec![0u8; size].into_boxed_slice(),
            tier,
            pools: Arc::clone(&self.pools),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
