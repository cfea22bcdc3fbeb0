pub mod display;
pub mod input;
pub mod storage;

pub use display::DisplayPanel;
pub use input::{Button, InputPad};
pub use storage::Storage;
