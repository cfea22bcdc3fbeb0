//! Program-image loading and ownership.
//!
//! An image is a read-only binary loaded whole into the slow pool. At most
//! one image exists at a time; loading a replacement releases the prior
//! image, but only after the new request has passed validation, so a
//! rejected path or an oversized file never costs the caller the image
//! they already had.

use tracing::{debug, info};

use crate::alloc::{OwnedBlock, Tier, TieredAllocator};
use crate::config::ImageConfig;
use crate::device::Storage;
use crate::error::{CoreError, Result};

// ---------------------------------------------------------------------------
// ProgramImage
// ---------------------------------------------------------------------------

/// A loaded program image. Immutable for its whole life; dropping it
/// returns its bytes to the slow pool.
pub struct ProgramImage {
    block: OwnedBlock,
    name: String,
}

impl ProgramImage {
    pub fn bytes(&self) -> &[u8] {
        self.block.bytes()
    }

    pub fn len(&self) -> usize {
        self.block.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    /// The storage path this image was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// ImageLoader
// ---------------------------------------------------------------------------

/// Validates and loads program images into the slow pool.
pub struct ImageLoader {
    max_size: usize,
}

impl ImageLoader {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            max_size: config.max_size,
        }
    }

    /// Load the image at `path` into `slot`, replacing any prior image.
    ///
    /// Returns the loaded size in bytes. Failure reasons are distinct:
    /// storage not ready is a configuration error; a missing, empty, or
    /// oversized file is a validation error; an absent slow pool is a
    /// configuration error; an exhausted slow pool is resource exhaustion;
    /// a short read is an I/O error. The first three fail before the prior
    /// image is released and leave it loaded; the rest occur after release
    /// and leave `slot` empty.
    pub fn load(
        &self,
        storage: &dyn Storage,
        alloc: &TieredAllocator,
        path: &str,
        slot: &mut Option<ProgramImage>,
    ) -> Result<usize> {
        if !storage.is_ready() {
            return Err(CoreError::Configuration("storage not initialized"));
        }
        if !storage.exists(path) {
            return Err(CoreError::Validation(format!("no such file: {path}")));
        }
        let size = storage.file_size(path)?;
        if size == 0 {
            return Err(CoreError::Validation(format!("empty file: {path}")));
        }
        if size > self.max_size as u64 {
            return Err(CoreError::Validation(format!(
                "{path} is {size} bytes, limit {}",
                self.max_size
            )));
        }
        let size = size as usize;

        // Validation passed; the single-image invariant takes over. From
        // here on a failure leaves no image loaded.
        if let Some(prior) = slot.take() {
            debug!(name = prior.name(), "releasing prior image");
        }

        // Images are pinned to the slow pool. Falling back to the fast
        // pool would starve the scripting host of internal memory.
        let mut block = alloc.allocate_pinned(Tier::Slow, size)?;
        let read = storage.read_into(path, block.bytes_mut())?;
        if read != size {
            return Err(CoreError::Io(format!(
                "short read: {read} of {size} bytes from {path}"
            )));
        }

        info!(path, size, "program image loaded");
        *slot = Some(ProgramImage {
            block,
            name: path.to_string(),
        });
        Ok(size)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
