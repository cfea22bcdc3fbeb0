//! A test-pattern engine that pulses the whole screen through the four
//! shades, one step per frame.

use lantern_core::engine::{Engine, EngineError, ScanlineSink};
use lantern_core::frame::{NATIVE_HEIGHT, NATIVE_WIDTH};

use crate::registry::EngineEntry;

pub struct PulseEngine {
    frame: u64,
}

impl PulseEngine {
    pub fn new() -> Self {
        Self { frame: 0 }
    }
}

impl Default for PulseEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for PulseEngine {
    fn power_on(&mut self, image: &[u8]) -> Result<(), EngineError> {
        if image.is_empty() {
            return Err(EngineError::BadImage("image is empty".to_string()));
        }
        self.frame = 0;
        Ok(())
    }

    fn run_frame(&mut self, _image: &[u8], sink: &mut dyn ScanlineSink) {
        let row = [(self.frame % 4) as u8; NATIVE_WIDTH];
        for y in 0..NATIVE_HEIGHT {
            sink.scanline(y as u32, &row);
        }
        self.frame += 1;
    }
}

// ---------------------------------------------------------------------------
// Engine registry
// ---------------------------------------------------------------------------

fn create_engine() -> Box<dyn Engine> {
    Box::new(PulseEngine::new())
}

inventory::submit! {
    EngineEntry::new("pulse", create_engine)
}
