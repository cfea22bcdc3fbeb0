//! The scripting bridge.
//!
//! `Console` owns the collaborator devices, the allocator, the emulator,
//! and the renderer, and exposes the operations the scripting host
//! registers as named callables. Operations report failures as values;
//! nothing here unwinds into the host.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::alloc::TieredAllocator;
use crate::blit::Renderer;
use crate::config::ConsoleConfig;
use crate::device::{Button, DisplayPanel, InputPad, Storage};
use crate::emulator::{Emulator, EmulatorStats};
use crate::engine::Engine;
use crate::error::{CoreError, Result};
use crate::image::ImageLoader;
use crate::modules::{ModuleError, ModuleResolver, ScriptHost};

pub struct Console {
    storage: Box<dyn Storage>,
    panel: Box<dyn DisplayPanel>,
    pad: Box<dyn InputPad>,
    alloc: Arc<TieredAllocator>,
    loader: ImageLoader,
    resolver: ModuleResolver,
    renderer: Renderer,
    emulator: Emulator,
}

impl Console {
    pub fn new(
        config: ConsoleConfig,
        engine: Box<dyn Engine>,
        storage: Box<dyn Storage>,
        panel: Box<dyn DisplayPanel>,
        pad: Box<dyn InputPad>,
    ) -> Result<Self> {
        let alloc = Arc::new(TieredAllocator::new(&config.alloc)?);
        let loader = ImageLoader::new(&config.image);
        let resolver = ModuleResolver::new(&config.modules);
        let emulator = Emulator::new(&config.emulator, engine)?;
        let renderer = Renderer::new(config.video)?;
        Ok(Self {
            storage,
            panel,
            pad,
            alloc,
            loader,
            resolver,
            renderer,
            emulator,
        })
    }

    /// The allocator, for wiring the scripting host's own memory hooks.
    pub fn allocator(&self) -> &Arc<TieredAllocator> {
        &self.alloc
    }

    // -- Session operations --------------------------------------------------

    /// Load a program image, reporting the outcome as status text:
    /// `ok: N bytes` or `error: ...`.
    pub fn load_image(&mut self, path: &str) -> String {
        if self.emulator.is_running() {
            let err = CoreError::State("cannot load while a session is running");
            warn!(%err, path, "image load rejected");
            return format!("error: {err}");
        }
        match self.loader.load(
            self.storage.as_ref(),
            &self.alloc,
            path,
            self.emulator.image_mut(),
        ) {
            Ok(size) => format!("ok: {size} bytes"),
            Err(err) => {
                warn!(%err, path, "image load failed");
                format!("error: {err}")
            }
        }
    }

    /// Start a session. Returns whether it started; failures are logged
    /// and leave any loaded image in place.
    pub fn start(&mut self) -> bool {
        match self.emulator.start() {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "session start failed");
                false
            }
        }
    }

    /// Stop the running session, blocking until the task has exited.
    /// Returns whether a session was actually stopped.
    pub fn stop(&mut self) -> bool {
        self.emulator.stop()
    }

    pub fn is_running(&self) -> bool {
        self.emulator.is_running()
    }

    pub fn has_image(&self) -> bool {
        self.emulator.has_image()
    }

    pub fn stats(&self) -> EmulatorStats {
        self.emulator.stats()
    }

    /// The latest complete frame, one masked byte per pixel.
    pub fn raw_buffer(&self) -> Vec<u8> {
        self.emulator.frames().copy_raw()
    }

    /// Rescale the latest complete frame onto the panel and refresh.
    pub fn render(&mut self) {
        self.renderer
            .render(self.emulator.frames(), self.panel.as_mut());
    }

    /// Block the calling script for `ms` milliseconds.
    pub fn sleep(&self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }

    // -- Input ---------------------------------------------------------------

    /// Whether a button is currently held.
    pub fn pressed(&self, button: Button) -> bool {
        self.pad.pressed(button)
    }

    // -- Graphics ------------------------------------------------------------

    /// Fill the panel's off-screen buffer with one level.
    pub fn clear(&mut self, on: bool) {
        self.panel.clear(on);
    }

    /// Set one panel pixel.
    pub fn draw_pixel(&mut self, x: u32, y: u32, on: bool) {
        self.panel.set_pixel(x, y, on);
    }

    /// Draw a 1-bit bitmap with its top-left corner at (x, y): MSB-first
    /// bits, rows padded to whole bytes. Set bits paint `on`; clear bits
    /// leave the panel untouched.
    pub fn draw_bitmap(&mut self, x: u32, y: u32, data: &[u8], width: u32, height: u32, on: bool) {
        let stride = width.div_ceil(8) as usize;
        for row in 0..height {
            for col in 0..width {
                let index = row as usize * stride + (col / 8) as usize;
                let Some(&bits) = data.get(index) else {
                    return;
                };
                if bits & (0x80 >> (col % 8)) != 0 {
                    self.panel
                        .set_pixel(x.saturating_add(col), y.saturating_add(row), on);
                }
            }
        }
    }

    /// Push the panel's off-screen buffer to the glass.
    pub fn refresh(&mut self) {
        self.panel.refresh();
    }

    // -- Module resolution -----------------------------------------------------

    /// Resolve and compile a script module by name.
    pub fn resolve_module<H: ScriptHost>(
        &self,
        host: &mut H,
        name: &str,
    ) -> std::result::Result<H::Module, ModuleError> {
        self.resolver.resolve(self.storage.as_ref(), host, name)
    }
}
