use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use lantern_core::console::Console;
use lantern_engines::registry;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod display;
mod input;
mod overlay;
mod storage;

/// Headless run of the handheld stack: load a program image, drive a
/// session, render to a memory panel, optionally capture a PNG.
#[derive(Parser)]
#[command(name = "lantern", version)]
struct Args {
    /// Engine to run (e.g., "bands").
    engine: String,

    /// Program image path. Its directory becomes the storage root.
    image: PathBuf,

    /// Frames to run before exiting.
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// Render sampling cadence in Hz.
    #[arg(long, default_value_t = 30)]
    refresh_hz: u32,

    /// Buttons to hold for the whole run, comma-separated (e.g., "a,left").
    #[arg(long)]
    hold: Option<String>,

    /// Draw the measured frame rate onto the panel.
    #[arg(long)]
    show_rate: bool,

    /// Write the final panel contents to this PNG.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Configuration file (TOML). Defaults to the per-user location.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = config::load(args.config.as_deref()).expect("Failed to load configuration");

    let entry = registry::find(&args.engine).unwrap_or_else(|| {
        let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
        eprintln!("Unknown engine: {}", args.engine);
        eprintln!("Available: {}", names.join(", "));
        std::process::exit(1);
    });

    let held = input::parse_held(args.hold.as_deref()).unwrap_or_else(|name| {
        eprintln!("Unknown button: {name}");
        std::process::exit(1);
    });

    let (root, image_name) = storage::split_image_path(&args.image);
    let panel = display::SnapshotPanel::new(
        config.console.video.panel_width,
        config.console.video.panel_height,
    );

    let mut console = Console::new(
        config.console,
        (entry.create)(),
        Box::new(storage::DirStorage::new(root)),
        Box::new(panel.clone()),
        Box::new(input::HeldPad::new(held)),
    )
    .expect("Failed to initialize console");

    let status = console.load_image(&image_name);
    if !status.starts_with("ok") {
        eprintln!("{status}");
        std::process::exit(1);
    }
    info!(engine = entry.name, image = %args.image.display(), "{status}");

    if !console.start() {
        eprintln!("Failed to start the session");
        std::process::exit(1);
    }

    run(&mut console, &args);
    console.stop();

    if let Some(path) = &args.snapshot {
        // One last blit so the capture shows the final frame.
        console.render();
        panel.save_png(path).expect("Failed to write snapshot");
        info!(path = %path.display(), "snapshot written");
    }

    let stats = console.stats();
    info!(frames = stats.frames, overruns = stats.overruns, "session complete");
}

/// Sample the session at the render cadence until enough frames have run.
/// The session thread paces itself; this loop only consumes.
fn run(console: &mut Console, args: &Args) {
    let refresh_period = Duration::from_secs(1) / args.refresh_hz.max(1);
    let started = Instant::now();

    while console.is_running() && console.stats().frames < args.frames {
        console.render();
        if args.show_rate {
            let elapsed = started.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 {
                console.stats().frames as f64 / elapsed
            } else {
                0.0
            };
            overlay::draw_rate(console, &format!("{rate:.1}"));
            console.refresh();
        }
        std::thread::sleep(refresh_period);
    }
}
