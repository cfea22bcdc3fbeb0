//! Nearest-neighbor rescale of the native frame onto the bilevel panel.
//!
//! The native 160x144 four-shade frame maps to a centered active region of
//! the panel at a fixed upscale factor. Shades reduce to ink/background at
//! a configurable threshold. Only the active region is written; the
//! margins belong to the scripting layer.

use crate::config::VideoConfig;
use crate::device::DisplayPanel;
use crate::error::{CoreError, Result};
use crate::frame::{FrameStore, NATIVE_HEIGHT, NATIVE_WIDTH};

// ---------------------------------------------------------------------------
// ScaleGeometry
// ---------------------------------------------------------------------------

/// Placement of the upscaled frame on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleGeometry {
    /// Active region width in panel pixels.
    pub width: u32,
    /// Active region height in panel pixels.
    pub height: u32,
    /// Left edge of the active region.
    pub x0: u32,
    /// Top edge of the active region.
    pub y0: u32,
}

impl ScaleGeometry {
    /// Derive the active region for `config`: the native frame scaled by
    /// `config.scale`, rounded to whole pixels, clamped to the panel, and
    /// centered with any odd remainder going to the right/bottom margin.
    pub fn from_config(config: &VideoConfig) -> Self {
        let width = ((NATIVE_WIDTH as f32 * config.scale).round() as u32).min(config.panel_width);
        let height =
            ((NATIVE_HEIGHT as f32 * config.scale).round() as u32).min(config.panel_height);
        Self {
            width,
            height,
            x0: (config.panel_width - width) / 2,
            y0: (config.panel_height - height) / 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Blits the latest complete frame onto a panel.
pub struct Renderer {
    config: VideoConfig,
}

impl Renderer {
    pub fn new(config: VideoConfig) -> Result<Self> {
        if !config.scale.is_finite() || config.scale <= 0.0 {
            return Err(CoreError::Configuration("scale must be positive"));
        }
        if config.ink_threshold > 3 {
            return Err(CoreError::Configuration(
                "ink threshold must be a 2-bit shade",
            ));
        }
        Ok(Self { config })
    }

    pub fn geometry(&self) -> ScaleGeometry {
        ScaleGeometry::from_config(&self.config)
    }

    /// Snapshot the latest complete frame, blit it, and refresh the panel.
    pub fn render(&self, frames: &FrameStore, panel: &mut dyn DisplayPanel) {
        let snapshot = frames.copy_raw();
        self.blit(&snapshot, panel);
        panel.refresh();
    }

    /// Nearest-neighbor blit of one native frame into the active region.
    fn blit(&self, frame: &[u8], panel: &mut dyn DisplayPanel) {
        let geom = self.geometry();
        for dy in 0..geom.height {
            let sy = ((dy as f32 / self.config.scale) as usize).min(NATIVE_HEIGHT - 1);
            for dx in 0..geom.width {
                let sx = ((dx as f32 / self.config.scale) as usize).min(NATIVE_WIDTH - 1);
                let shade = frame[sy * NATIVE_WIDTH + sx];
                panel.set_pixel(
                    geom.x0 + dx,
                    geom.y0 + dy,
                    shade >= self.config.ink_threshold,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
