// Air canvas: paint on the live camera feed with one hand.
// • Index finger up: draw with the current tool.
// • Index + middle up: selection mode; touch a swatch in the header band.
// • Whole hand open: clear the canvas.
// • Q (or closing the window) quits.

mod camera;
mod canvas;
mod compositor;
mod config;
mod detector;
mod error;
mod gesture;
mod headers;
mod types;
mod window;

use std::env;
use std::path::Path;
use std::time::{Duration, Instant};

use camera::CameraCapture;
use canvas::{draw_transients, Canvas};
use compositor::Compositor;
use config::Config;
use detector::{LandmarkSource, ProcessDetector};
use error::Error;
use gesture::Interpreter;
use log::{debug, info, warn};
use window::Screen;

fn main() -> Result<(), Error> {
    env_logger::builder()
        .filter_module(env!("CARGO_CRATE_NAME"), log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    let config = match &*env::args_os().skip(1).collect::<Vec<_>>() {
        [] => Config::default(),
        [path] => Config::load(path)?,
        _ => {
            return Err(Error::Config(format!("usage: {} [config.toml]", env!("CARGO_PKG_NAME"))));
        }
    };

    /* --- Camera, header images, windows, detector --- */
    let mut cam = CameraCapture::new(config.camera_index, config.width, config.height)?;
    let (w, h) = cam.resolution();
    for z in config.zones_beyond(w) {
        warn!("zone {}..{} (header {}) extends past the {w}px frame", z.min_x, z.max_x, z.header);
    }
    let headers = headers::load_headers(Path::new(&config.header_dir), w, config.band_height as u32)?;
    let mut screen = Screen::new(w as usize, h as usize, config.debug_views)?;
    let mut detector = ProcessDetector::spawn(&config.detector)?;

    /* --- State that survives across frames --- */
    let mut interpreter = Interpreter::new(&config);
    let mut canvas = Canvas::new(w as usize, h as usize);
    let compositor = Compositor::new(&config);

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    info!("running at {w}x{h}; press Q to quit");
    while screen.is_open() && !screen.quit_pressed() {
        // 1) Live frame; a failed grab just skips this tick.
        let mut live = match cam.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("{e}");
                screen.pump();
                continue;
            }
        };

        // 2) Hand landmarks; a detector hiccup counts as "no hand".
        let hand = detector.detect(&live).unwrap_or_else(|e| {
            warn!("{e}");
            None
        });

        // 3) Gesture -> tool state + canvas.
        let step = interpreter.step(hand.as_ref());
        canvas.apply(&step);
        draw_transients(&mut live, &step);

        // 4) Merge canvas over the video, header band on top.
        let header = headers.get(interpreter.state().header);
        let out = compositor.compose(&live, canvas.snapshot(), header);
        // A failed window update costs one frame, not the session.
        if let Err(e) = screen.present(&out.image, canvas.snapshot(), &out.mask) {
            warn!("{e}");
        }

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            debug!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("bye");
    Ok(())
}
