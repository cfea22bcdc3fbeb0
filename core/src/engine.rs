//! Emulation-core interface.
//!
//! The coordination layer treats the emulation core as an opaque stepping
//! function: given a read-only program image, one call advances emulated
//! time by one frame and delivers the frame's pixels a scanline at a time.
//! Pixel semantics, instruction decoding, and timing inside the frame are
//! entirely the engine's business.

use thiserror::Error;

/// Errors an engine can report at power-on.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The program image is not something this engine can run.
    #[error("rejected program image: {0}")]
    BadImage(String),
}

/// Receives one frame's pixels, a scanline at a time.
///
/// Rows arrive top to bottom. `pixels` holds one byte per pixel with the
/// shade in the low two bits; the sink masks, so engines may pass raw
/// bytes through. A row outside the native height is dropped by the sink.
pub trait ScanlineSink {
    fn scanline(&mut self, row: u32, pixels: &[u8]);
}

/// An emulation core driven by the periodic task.
///
/// `Send` because the engine moves onto the task thread for the lifetime
/// of a session and moves back when the session stops.
pub trait Engine: Send {
    /// Validate the program image and reset to power-on state.
    ///
    /// Called on the control thread before the task thread starts. On an
    /// error the session does not start and the image stays loaded.
    fn power_on(&mut self, image: &[u8]) -> Result<(), EngineError>;

    /// Advance emulated time by one frame, delivering every scanline of
    /// the completed frame to `sink` in top-to-bottom order.
    fn run_frame(&mut self, image: &[u8], sink: &mut dyn ScanlineSink);
}
