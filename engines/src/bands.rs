//! A deterministic test-pattern engine: horizontal bands whose shades are
//! taken from the program image, scrolling one band per frame.
//!
//! Exercises the full pipeline (image loading, session thread, frame
//! handoff, rescale) without a real emulation core. The same image always
//! produces the same frame sequence.

use lantern_core::engine::{Engine, EngineError, ScanlineSink};
use lantern_core::frame::{NATIVE_HEIGHT, NATIVE_WIDTH};

use crate::registry::EngineEntry;

/// Scanlines per band.
const BAND_ROWS: usize = 8;

pub struct BandsEngine {
    frame: u64,
}

impl BandsEngine {
    pub fn new() -> Self {
        Self { frame: 0 }
    }
}

impl Default for BandsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for BandsEngine {
    fn power_on(&mut self, image: &[u8]) -> Result<(), EngineError> {
        if image.is_empty() {
            return Err(EngineError::BadImage("image is empty".to_string()));
        }
        self.frame = 0;
        Ok(())
    }

    fn run_frame(&mut self, image: &[u8], sink: &mut dyn ScanlineSink) {
        if image.is_empty() {
            return;
        }
        let mut row = [0u8; NATIVE_WIDTH];
        for y in 0..NATIVE_HEIGHT {
            let band = y / BAND_ROWS;
            let index = (band + self.frame as usize) % image.len();
            row.fill(image[index] & 0x03);
            sink.scanline(y as u32, &row);
        }
        self.frame += 1;
    }
}

// ---------------------------------------------------------------------------
// Engine registry
// ---------------------------------------------------------------------------

fn create_engine() -> Box<dyn Engine> {
    Box::new(BandsEngine::new())
}

inventory::submit! {
    EngineEntry::new("bands", create_engine)
}
