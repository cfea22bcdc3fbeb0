//! Configuration for the coordination layer.
//!
//! Every board-tuning constant observed in the reference firmware is carried
//! here as a default rather than a hard-coded value: pool capacities and the
//! tier threshold, the program-image size cap, the frame cadence, the panel
//! geometry and rescale factor, and the script module extension.

use serde::Deserialize;

/// Top-level configuration consumed by [`Console::new`](crate::console::Console::new).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub alloc: AllocConfig,
    pub image: ImageConfig,
    pub emulator: EmulatorConfig,
    pub video: VideoConfig,
    pub modules: ModuleConfig,
}

/// Tiered-allocator tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AllocConfig {
    /// Byte budget of the fast internal pool.
    pub fast_capacity: usize,
    /// Byte budget of the slow external pool, or `None` on boards without
    /// the external memory part fitted.
    pub slow_capacity: Option<usize>,
    /// Requests at or above this size route to the slow pool first.
    pub threshold: usize,
}

impl Default for AllocConfig {
    fn default() -> Self {
        Self {
            fast_capacity: 192 * 1024,
            slow_capacity: Some(4 * 1024 * 1024),
            threshold: 2048,
        }
    }
}

/// Program-image loader limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Largest accepted program image in bytes.
    pub max_size: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_size: 2 * 1024 * 1024,
        }
    }
}

/// Emulation task cadence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Target frames per second for the periodic task.
    pub frame_rate: u32,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self { frame_rate: 60 }
    }
}

/// Rescale/blit geometry and shade policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Panel width in pixels.
    pub panel_width: u32,
    /// Panel height in pixels.
    pub panel_height: u32,
    /// Nearest-neighbor upscale factor from the native frame.
    pub scale: f32,
    /// Lowest 2-bit shade rendered as ink. Shades below it render as
    /// background.
    pub ink_threshold: u8,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            panel_width: 400,
            panel_height: 240,
            scale: 1.66,
            ink_threshold: 2,
        }
    }
}

/// Script module resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Extension appended to module names that lack it (e.g., ".lua").
    pub extension: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            extension: ".lua".to_string(),
        }
    }
}
