pub mod pool;
pub mod tiered;

pub use pool::{MemoryPool, Tier};
pub use tiered::{OwnedBlock, TieredAllocator};
