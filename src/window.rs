// On-screen views: the composited image, plus the raw canvas and the inverse
// mask when debug views are enabled.

use crate::error::Error;
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

fn open(title: &str, width: usize, height: usize) -> Result<Window, Error> {
    let mut window = Window::new(title, width, height, WindowOptions::default())
        .map_err(|e| Error::WindowInit(format!("{title}: {e}")))?;
    window.set_target_fps(60);
    Ok(window)
}

fn push(window: &mut Window, fb: &FrameBuffer) -> Result<(), Error> {
    window
        .update_with_buffer(&fb.pixels, fb.width, fb.height)
        .map_err(|e| Error::WindowUpdate(e.to_string()))
}

pub struct Screen {
    image: Window,
    debug: Option<(Window, Window)>, // (canvas, inverse mask)
}

impl Screen {
    pub fn new(width: usize, height: usize, debug_views: bool) -> Result<Self, Error> {
        let image = open("Image", width, height)?;
        let debug = if debug_views {
            Some((open("Canvas", width, height)?, open("Inv", width, height)?))
        } else {
            None
        };
        Ok(Self { image, debug })
    }

    /// Push this frame's buffers to their windows.
    pub fn present(&mut self, image: &FrameBuffer, canvas: &FrameBuffer, mask: &FrameBuffer) -> Result<(), Error> {
        push(&mut self.image, image)?;
        if let Some((canvas_win, mask_win)) = &mut self.debug {
            push(canvas_win, canvas)?;
            push(mask_win, mask)?;
        }
        Ok(())
    }

    /// Process window events without a new image (used when a frame is skipped).
    pub fn pump(&mut self) {
        self.image.update();
    }

    /// False once the user closes the main window.
    pub fn is_open(&self) -> bool {
        self.image.is_open()
    }

    /// True on the frame `Q` goes down.
    pub fn quit_pressed(&self) -> bool {
        self.image.is_key_pressed(Key::Q, KeyRepeat::No)
    }
}
