#![allow(dead_code)] // each test binary uses a subset of these doubles

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lantern_core::device::{Button, DisplayPanel, InputPad, Storage};
use lantern_core::engine::{Engine, EngineError, ScanlineSink};
use lantern_core::error::{CoreError, Result};
use lantern_core::frame::{NATIVE_HEIGHT, NATIVE_WIDTH};

// ---------------------------------------------------------------------------
// Storage double
// ---------------------------------------------------------------------------

/// In-memory storage: named byte files plus a ready flag.
pub struct MemStorage {
    ready: bool,
    files: HashMap<String, Vec<u8>>,
}

impl MemStorage {
    pub fn with_files(entries: &[(&str, &[u8])]) -> Self {
        let mut files = HashMap::new();
        for (name, data) in entries {
            files.insert(name.to_string(), data.to_vec());
        }
        Self { ready: true, files }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            files: HashMap::new(),
        }
    }
}

impl Storage for MemStorage {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn file_size(&self, path: &str) -> Result<u64> {
        self.files
            .get(path)
            .map(|d| d.len() as u64)
            .ok_or_else(|| CoreError::Io(format!("no such file: {path}")))
    }

    fn read_into(&self, path: &str, buf: &mut [u8]) -> Result<usize> {
        let data = self
            .files
            .get(path)
            .ok_or_else(|| CoreError::Io(format!("no such file: {path}")))?;
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }

    fn read_text(&self, path: &str) -> Result<String> {
        let data = self
            .files
            .get(path)
            .ok_or_else(|| CoreError::Io(format!("no such file: {path}")))?;
        String::from_utf8(data.clone())
            .map_err(|_| CoreError::Validation(format!("not UTF-8: {path}")))
    }
}

// ---------------------------------------------------------------------------
// Display double
// ---------------------------------------------------------------------------

struct PanelState {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
    written: Vec<bool>,
    refreshes: u32,
}

/// Records every pixel write and refresh. Clones share state, so a test
/// can keep a probe after moving the panel into a `Console`.
#[derive(Clone)]
pub struct RecordingPanel {
    state: Arc<Mutex<PanelState>>,
}

impl RecordingPanel {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            state: Arc::new(Mutex::new(PanelState {
                width,
                height,
                pixels: vec![false; len],
                written: vec![false; len],
                refreshes: 0,
            })),
        }
    }

    pub fn ink_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.pixels.iter().filter(|&&p| p).count()
    }

    pub fn written_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.written.iter().filter(|&&w| w).count()
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        let state = self.state.lock().unwrap();
        state.pixels[(y * state.width + x) as usize]
    }

    pub fn was_written(&self, x: u32, y: u32) -> bool {
        let state = self.state.lock().unwrap();
        state.written[(y * state.width + x) as usize]
    }

    pub fn refreshes(&self) -> u32 {
        self.state.lock().unwrap().refreshes
    }
}

impl DisplayPanel for RecordingPanel {
    fn size(&self) -> (u32, u32) {
        let state = self.state.lock().unwrap();
        (state.width, state.height)
    }

    fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        let mut state = self.state.lock().unwrap();
        if x < state.width && y < state.height {
            let index = (y * state.width + x) as usize;
            state.pixels[index] = on;
            state.written[index] = true;
        }
    }

    fn refresh(&mut self) {
        self.state.lock().unwrap().refreshes += 1;
    }
}

// ---------------------------------------------------------------------------
// Input double
// ---------------------------------------------------------------------------

/// A pad with a fixed set of held buttons.
pub struct StaticPad {
    held: Vec<Button>,
}

impl StaticPad {
    pub fn holding(held: &[Button]) -> Self {
        Self {
            held: held.to_vec(),
        }
    }
}

impl InputPad for StaticPad {
    fn pressed(&self, button: Button) -> bool {
        self.held.contains(&button)
    }
}

// ---------------------------------------------------------------------------
// Engine doubles
// ---------------------------------------------------------------------------

/// Emits a full frame of one fixed shade.
pub struct ShadeEngine {
    pub shade: u8,
}

impl Engine for ShadeEngine {
    fn power_on(&mut self, _image: &[u8]) -> std::result::Result<(), EngineError> {
        Ok(())
    }

    fn run_frame(&mut self, _image: &[u8], sink: &mut dyn ScanlineSink) {
        for row in 0..NATIVE_HEIGHT as u32 {
            sink.scanline(row, &[self.shade; NATIVE_WIDTH]);
        }
    }
}

/// Misbehaves on purpose: raw unmasked bytes, a row past the native
/// height, and a short row. The sink must absorb all of it.
pub struct RawEngine;

impl Engine for RawEngine {
    fn power_on(&mut self, _image: &[u8]) -> std::result::Result<(), EngineError> {
        Ok(())
    }

    fn run_frame(&mut self, _image: &[u8], sink: &mut dyn ScanlineSink) {
        for row in 0..NATIVE_HEIGHT as u32 {
            sink.scanline(row, &[0xAB; NATIVE_WIDTH]);
        }
        sink.scanline(200, &[0xFF; NATIVE_WIDTH]);
        sink.scanline(1, &[0xFF; 7]);
    }
}

/// Rejects every image at power-on.
pub struct FailingEngine;

impl Engine for FailingEngine {
    fn power_on(&mut self, _image: &[u8]) -> std::result::Result<(), EngineError> {
        Err(EngineError::BadImage("rejects everything".to_string()))
    }

    fn run_frame(&mut self, _image: &[u8], _sink: &mut dyn ScanlineSink) {}
}
