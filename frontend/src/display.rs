//! In-memory monochrome panel with PNG capture.

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use lantern_core::device::DisplayPanel;

struct PanelState {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
    refreshes: u64,
}

/// A memory-backed panel surface. Clones share the surface, so the
/// front-end keeps a handle for capture while the console owns the device.
#[derive(Clone)]
pub struct SnapshotPanel {
    state: Arc<Mutex<PanelState>>,
}

impl SnapshotPanel {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(PanelState {
                width,
                height,
                pixels: vec![false; (width * height) as usize],
                refreshes: 0,
            })),
        }
    }

    pub fn refreshes(&self) -> u64 {
        self.state.lock().unwrap().refreshes
    }

    /// Save the panel surface as an 8-bit grayscale PNG: ink pixels black,
    /// clear pixels white.
    pub fn save_png(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let state = self.state.lock().unwrap();

        let file = fs::File::create(path)?;
        let w = std::io::BufWriter::new(file);
        let mut encoder = png::Encoder::new(w, state.width, state.height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;

        let gray: Vec<u8> = state
            .pixels
            .iter()
            .map(|&on| if on { 0x00 } else { 0xFF })
            .collect();
        writer.write_image_data(&gray)?;
        Ok(())
    }
}

impl DisplayPanel for SnapshotPanel {
    fn size(&self) -> (u32, u32) {
        let state = self.state.lock().unwrap();
        (state.width, state.height)
    }

    fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        let mut state = self.state.lock().unwrap();
        if x < state.width && y < state.height {
            let index = (y * state.width + x) as usize;
            state.pixels[index] = on;
        }
    }

    fn refresh(&mut self) {
        self.state.lock().unwrap().refreshes += 1;
    }
}
