//! The periodic emulation task.
//!
//! A session is a dedicated thread stepping the engine one frame per
//! period. The control plane owns the engine and image while idle; both
//! move onto the task thread for the session's lifetime and move back when
//! the session stops, so a restart needs no reallocation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::EmulatorConfig;
use crate::engine::Engine;
use crate::error::{CoreError, Result};
use crate::frame::{FrameStore, FrameWriter};
use crate::image::ProgramImage;

/// Read-only snapshot of pacing counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmulatorStats {
    /// Frames published since construction, across sessions.
    pub frames: u64,
    /// Iterations of the current or most recent session that exceeded the
    /// frame period.
    pub overruns: u64,
}

/// A live session: the task thread and its stop flag.
struct Session {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<(Box<dyn Engine>, ProgramImage)>,
}

/// Drives the engine at a fixed cadence on a dedicated thread.
pub struct Emulator {
    period: Duration,
    frames: Arc<FrameStore>,
    overruns: Arc<AtomicU64>,
    engine: Option<Box<dyn Engine>>,
    image: Option<ProgramImage>,
    session: Option<Session>,
}

impl Emulator {
    pub fn new(config: &EmulatorConfig, engine: Box<dyn Engine>) -> Result<Self> {
        if config.frame_rate == 0 {
            return Err(CoreError::Configuration("frame rate must be nonzero"));
        }
        Ok(Self {
            period: Duration::from_nanos(1_000_000_000 / u64::from(config.frame_rate)),
            frames: Arc::new(FrameStore::new()),
            overruns: Arc::new(AtomicU64::new(0)),
            engine: Some(engine),
            image: None,
            session: None,
        })
    }

    /// The frame handoff shared with consumers.
    pub fn frames(&self) -> &Arc<FrameStore> {
        &self.frames
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// The image slot, for the loader. Callers reject loads while a
    /// session is running; during a session the slot is empty because the
    /// image lives on the task thread.
    pub fn image_mut(&mut self) -> &mut Option<ProgramImage> {
        &mut self.image
    }

    pub fn stats(&self) -> EmulatorStats {
        EmulatorStats {
            frames: self.frames.frame_count(),
            overruns: self.overruns.load(Ordering::Relaxed),
        }
    }

    /// Power the engine on against the loaded image and spawn the task.
    ///
    /// Fails with a state error when already running or when no image is
    /// loaded, and with the engine's own error when it rejects the image;
    /// in every such case the image stays loaded and the state stays idle.
    pub fn start(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(CoreError::State("session already running"));
        }
        let Some(image) = self.image.take() else {
            return Err(CoreError::State("no program image loaded"));
        };
        let Some(mut engine) = self.engine.take() else {
            self.image = Some(image);
            return Err(CoreError::State("engine lost to an earlier task panic"));
        };

        if let Err(e) = engine.power_on(image.bytes()) {
            self.engine = Some(engine);
            self.image = Some(image);
            return Err(CoreError::EngineInit(e.to_string()));
        }

        info!(image = image.name(), "starting emulation session");
        let stop = Arc::new(AtomicBool::new(false));
        let writer = FrameWriter::new(Arc::clone(&self.frames));
        self.overruns.store(0, Ordering::Relaxed);

        let spawn = {
            let stop = Arc::clone(&stop);
            let overruns = Arc::clone(&self.overruns);
            let period = self.period;
            thread::Builder::new()
                .name("emulation".to_string())
                .spawn(move || run_session(engine, image, writer, stop, overruns, period))
        };
        match spawn {
            Ok(thread) => {
                self.session = Some(Session { stop, thread });
                Ok(())
            }
            // The closure owning engine and image was dropped with the
            // failed spawn; only a fresh Emulator recovers from this.
            Err(e) => Err(CoreError::Io(format!("failed to spawn task thread: {e}"))),
        }
    }

    /// Signal the task to stop and block until it has.
    ///
    /// Returns `false` (a logged no-op) when no session is running. The
    /// wait is unbounded; an engine stuck inside `run_frame` hangs the
    /// caller.
    pub fn stop(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            debug!("stop requested while idle");
            return false;
        };
        session.stop.store(true, Ordering::Release);
        match session.thread.join() {
            Ok((engine, image)) => {
                debug_assert!(self.image.is_none());
                self.engine = Some(engine);
                self.image = Some(image);
                info!("emulation session stopped");
            }
            Err(_) => {
                warn!("emulation task panicked; engine and image lost");
            }
        }
        true
    }
}

impl Drop for Emulator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Task body: one frame per period until the stop flag is seen.
fn run_session(
    mut engine: Box<dyn Engine>,
    image: ProgramImage,
    mut writer: FrameWriter,
    stop: Arc<AtomicBool>,
    overruns: Arc<AtomicU64>,
    period: Duration,
) -> (Box<dyn Engine>, ProgramImage) {
    debug!(period_us = period.as_micros() as u64, "emulation task running");
    loop {
        if stop.load(Ordering::Acquire) {
            break;
        }
        let frame_start = Instant::now();
        engine.run_frame(image.bytes(), &mut writer);
        writer.finish_frame();

        // Best-effort pacing: sleep off the remainder of the period, or
        // start the next frame immediately after an overrun. Lost time is
        // never made up.
        match period.checked_sub(frame_start.elapsed()) {
            Some(remaining) => thread::sleep(remaining),
            None => {
                overruns.fetch_add(1, Ordering::Relaxed);
                debug!("frame overran its period");
            }
        }
    }
    (engine, image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineError, ScanlineSink};

    struct NullEngine;

    impl Engine for NullEngine {
        fn power_on(&mut self, _image: &[u8]) -> std::result::Result<(), EngineError> {
            Ok(())
        }
        fn run_frame(&mut self, _image: &[u8], _sink: &mut dyn ScanlineSink) {}
    }

    #[test]
    fn zero_frame_rate_is_rejected() {
        let result = Emulator::new(&EmulatorConfig { frame_rate: 0 }, Box::new(NullEngine));
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }

    #[test]
    fn period_derived_from_frame_rate() {
        let emulator = Emulator::new(&EmulatorConfig { frame_rate: 60 }, Box::new(NullEngine));
        assert_eq!(emulator.unwrap().period, Duration::from_nanos(16_666_666));
    }

    #[test]
    fn start_without_image_is_state_error() {
        let mut emulator =
            Emulator::new(&EmulatorConfig { frame_rate: 60 }, Box::new(NullEngine)).unwrap();
        assert!(matches!(
            emulator.start(),
            Err(CoreError::State("no program image loaded"))
        ));
        assert!(!emulator.is_running());
    }

    #[test]
    fn stop_while_idle_is_a_no_op() {
        let mut emulator =
            Emulator::new(&EmulatorConfig { frame_rate: 60 }, Box::new(NullEngine)).unwrap();
        assert!(!emulator.stop());
    }
}
