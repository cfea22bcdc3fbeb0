//! Native pixel buffers and the producer/consumer frame handoff.
//!
//! The emulation task writes scanlines into a private working buffer and
//! publishes the completed frame with an O(1) swap under a short mutex.
//! Consumers snapshot the latest complete frame; a half-written frame is
//! never observable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::engine::ScanlineSink;

/// Native frame width in pixels.
pub const NATIVE_WIDTH: usize = 160;
/// Native frame height in pixels.
pub const NATIVE_HEIGHT: usize = 144;
/// One byte per pixel.
pub const FRAME_BYTES: usize = NATIVE_WIDTH * NATIVE_HEIGHT;

/// Low two bits carry the shade; engines may emit raw bytes.
const SHADE_MASK: u8 = 0x03;

// ---------------------------------------------------------------------------
// PixelBuffer
// ---------------------------------------------------------------------------

/// A native-resolution frame, one byte per pixel, shades 0..=3.
///
/// 0 is the lightest shade and 3 the darkest, matching the emulated LCD's
/// four grey levels.
pub struct PixelBuffer {
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new() -> Self {
        Self {
            data: vec![0; FRAME_BYTES],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * NATIVE_WIDTH + x]
    }

    /// Store a shade, masking to the low two bits.
    pub fn set(&mut self, x: usize, y: usize, shade: u8) {
        self.data[y * NATIVE_WIDTH + x] = shade & SHADE_MASK;
    }

    pub fn fill(&mut self, shade: u8) {
        self.data.fill(shade & SHADE_MASK);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Overwrite row `y` from `pixels`, masking each byte. A short slice
    /// zero-fills the remainder of the row; excess bytes are ignored.
    fn write_row(&mut self, y: usize, pixels: &[u8]) {
        let row = &mut self.data[y * NATIVE_WIDTH..(y + 1) * NATIVE_WIDTH];
        let copy = pixels.len().min(NATIVE_WIDTH);
        for (dst, &src) in row[..copy].iter_mut().zip(pixels) {
            *dst = src & SHADE_MASK;
        }
        row[copy..].fill(0);
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// FrameStore
// ---------------------------------------------------------------------------

/// Consumer side of the handoff: the most recently completed frame.
pub struct FrameStore {
    latest: Mutex<PixelBuffer>,
    published: AtomicU64,
}

impl FrameStore {
    pub fn new() -> Self {
        Self {
            latest: Mutex::new(PixelBuffer::new()),
            published: AtomicU64::new(0),
        }
    }

    /// Frames published since construction. Before the first publication
    /// the latest frame is the initial all-zero buffer.
    pub fn frame_count(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }

    /// Snapshot the latest complete frame's bytes.
    ///
    /// The copy happens under the handoff mutex; callers render from the
    /// snapshot so the producer is never blocked on panel I/O.
    pub fn copy_raw(&self) -> Vec<u8> {
        self.lock_latest().data.clone()
    }

    /// Swap `working` with the latest frame and count the publication.
    fn publish(&self, working: &mut PixelBuffer) {
        {
            let mut latest = self.lock_latest();
            std::mem::swap(&mut latest.data, &mut working.data);
        }
        self.published.fetch_add(1, Ordering::Release);
    }

    // The lock window is a pointer swap or a memcpy; if a producer died
    // mid-window the buffer it left is still a whole frame, so poisoning
    // is recoverable.
    fn lock_latest(&self) -> MutexGuard<'_, PixelBuffer> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// FrameWriter
// ---------------------------------------------------------------------------

/// Producer side of the handoff, owned by the emulation task.
///
/// Scanline writes touch only the private working buffer; no lock is
/// taken until [`finish_frame`](Self::finish_frame).
pub struct FrameWriter {
    store: Arc<FrameStore>,
    working: PixelBuffer,
    dropped_rows: u32,
}

impl FrameWriter {
    pub fn new(store: Arc<FrameStore>) -> Self {
        Self {
            store,
            working: PixelBuffer::new(),
            dropped_rows: 0,
        }
    }

    /// Publish the working buffer as the latest complete frame.
    pub fn finish_frame(&mut self) {
        self.store.publish(&mut self.working);
        self.dropped_rows = 0;
    }
}

impl ScanlineSink for FrameWriter {
    fn scanline(&mut self, row: u32, pixels: &[u8]) {
        if row as usize >= NATIVE_HEIGHT {
            if self.dropped_rows == 0 {
                warn!(row, "scanline outside native height dropped");
            }
            self.dropped_rows += 1;
            return;
        }
        self.working.write_row(row as usize, pixels);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
