mod common;

use std::time::{Duration, Instant};

use common::{FailingEngine, MemStorage, RawEngine, RecordingPanel, ShadeEngine, StaticPad};
use lantern_core::config::ConsoleConfig;
use lantern_core::console::Console;
use lantern_core::engine::{Engine, EngineError, ScanlineSink};
use lantern_core::frame::FRAME_BYTES;

/// An engine whose frame takes far longer than the 60 Hz period.
struct SlowEngine;

impl Engine for SlowEngine {
    fn power_on(&mut self, _image: &[u8]) -> Result<(), EngineError> {
        Ok(())
    }

    fn run_frame(&mut self, _image: &[u8], _sink: &mut dyn ScanlineSink) {
        std::thread::sleep(Duration::from_millis(30));
    }
}

fn console_with(engine: Box<dyn Engine>, files: &[(&str, &[u8])]) -> Console {
    let storage = Box::new(MemStorage::with_files(files));
    let panel = Box::new(RecordingPanel::new(400, 240));
    let pad = Box::new(StaticPad::holding(&[]));
    Console::new(ConsoleConfig::default(), engine, storage, panel, pad).unwrap()
}

fn loaded_console(engine: Box<dyn Engine>) -> Console {
    let mut console = console_with(engine, &[("game.img", &[0x42; 1000])]);
    let status = console.load_image("game.img");
    assert_eq!(status, "ok: 1000 bytes");
    console
}

fn wait_for_frames(console: &Console, target: u64) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while console.stats().frames < target {
        assert!(
            Instant::now() < deadline,
            "frame count stuck at {}",
            console.stats().frames
        );
        std::thread::sleep(Duration::from_millis(5));
    }
}

// ===== Session State Machine =====

#[test]
fn test_start_without_image_fails() {
    let mut console = console_with(Box::new(ShadeEngine { shade: 0 }), &[]);
    assert!(!console.start());
    assert!(!console.is_running());
}

#[test]
fn test_start_twice_fails_but_keeps_running() {
    let mut console = loaded_console(Box::new(ShadeEngine { shade: 1 }));
    assert!(console.start());
    assert!(!console.start());
    assert!(console.is_running());
    assert!(console.stop());
}

#[test]
fn test_stop_while_idle_is_a_no_op() {
    let mut console = loaded_console(Box::new(ShadeEngine { shade: 1 }));
    assert!(!console.stop());
    assert!(!console.is_running());
}

#[test]
fn test_power_on_failure_keeps_image_and_stays_idle() {
    let mut console = loaded_console(Box::new(FailingEngine));
    assert!(!console.start());
    assert!(!console.is_running());
    assert!(console.has_image());
}

#[test]
fn test_load_while_running_is_rejected() {
    let mut console = loaded_console(Box::new(ShadeEngine { shade: 2 }));
    assert!(console.start());

    let status = console.load_image("game.img");
    assert!(status.starts_with("error"));
    assert!(status.contains("running"));

    // The running session and its image are unaffected.
    assert!(console.is_running());
    assert!(console.stop());
    assert!(console.start());
    assert!(console.stop());
}

// ===== Cadence and Shutdown =====

#[test]
fn test_session_produces_frames() {
    let mut console = loaded_console(Box::new(ShadeEngine { shade: 3 }));
    assert!(console.start());
    wait_for_frames(&console, 3);
    assert!(console.stop());
}

#[test]
fn test_stop_halts_frame_production() {
    let mut console = loaded_console(Box::new(ShadeEngine { shade: 3 }));
    assert!(console.start());
    wait_for_frames(&console, 2);
    assert!(console.stop());

    let frozen = console.stats().frames;
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(console.stats().frames, frozen);
}

#[test]
fn test_restart_after_stop_produces_more_frames() {
    let mut console = loaded_console(Box::new(ShadeEngine { shade: 2 }));
    assert!(console.start());
    wait_for_frames(&console, 2);
    assert!(console.stop());

    let before = console.stats().frames;
    assert!(console.start());
    wait_for_frames(&console, before + 2);
    assert!(console.stop());
}

#[test]
fn test_overruns_counted_not_caught_up() {
    let mut console = loaded_console(Box::new(SlowEngine));
    assert!(console.start());
    wait_for_frames(&console, 3);
    assert!(console.stop());

    // Every 30 ms frame blows the 16.7 ms budget.
    assert!(console.stats().overruns >= 1);
}

// ===== Raw Buffer =====

#[test]
fn test_raw_buffer_is_sized_and_masked() {
    let mut console = loaded_console(Box::new(RawEngine));
    assert!(console.start());
    wait_for_frames(&console, 2);
    assert!(console.stop());

    let raw = console.raw_buffer();
    assert_eq!(raw.len(), FRAME_BYTES);
    assert!(raw.iter().all(|&b| b <= 3));
    // 0xAB masks to 3, so the masked content is visible, not zeroed.
    assert!(raw.iter().any(|&b| b == 3));
}

#[test]
fn test_raw_buffer_before_first_frame_is_zeroed() {
    let console = loaded_console(Box::new(ShadeEngine { shade: 3 }));
    let raw = console.raw_buffer();
    assert_eq!(raw.len(), FRAME_BYTES);
    assert!(raw.iter().all(|&b| b == 0));
}
