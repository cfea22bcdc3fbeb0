pub mod alloc;
pub mod blit;
pub mod config;
pub mod console;
pub mod device;
pub mod emulator;
pub mod engine;
pub mod error;
pub mod frame;
pub mod image;
pub mod modules;

pub mod prelude {
    pub use crate::alloc::{OwnedBlock, Tier, TieredAllocator};
    pub use crate::config::ConsoleConfig;
    pub use crate::console::Console;
    pub use crate::device::{Button, DisplayPanel, InputPad, Storage};
    pub use crate::engine::{Engine, EngineError, ScanlineSink};
    pub use crate::error::{CoreError, Result};
    pub use crate::frame::{FRAME_BYTES, NATIVE_HEIGHT, NATIVE_WIDTH};
}
