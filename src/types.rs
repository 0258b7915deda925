// Core types shared by the interpreter, the canvas and the compositor.

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// An all-zero (black) buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Pixel at (x,y), or None when outside the buffer.
    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Mirror left-right in place, so the feed behaves like a mirror.
    pub fn flip_horizontal(&mut self) {
        if self.width == 0 {
            return;
        }
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.reverse();
        }
    }
}

/// Integer pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const MAGENTA: Rgb = Rgb(255, 0, 255);

    /// Pack as 0x00RRGGBB.
    pub const fn packed(self) -> u32 {
        ((self.0 as u32) << 16) | ((self.1 as u32) << 8) | self.2 as u32
    }
}

/// What a stroke does to the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Paint(Rgb),
    /// Rasterises background (zero) into the canvas.
    Erase,
}

impl Tool {
    /// Colour written into buffers for this tool.
    pub const fn color(self) -> Rgb {
        match self {
            Tool::Paint(c) => c,
            Tool::Erase => Rgb::BLACK,
        }
    }
}

/// Landmark ids (21-point hand model).
pub mod landmarks {
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;

    pub const FINGER_TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
    pub const COUNT: usize = 21;
}

/// Which fingers are held up, thumb to pinky.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerVector(pub [bool; 5]);

impl FingerVector {
    pub fn index(self) -> bool { self.0[1] }
    pub fn middle(self) -> bool { self.0[2] }
    pub fn all(self) -> bool { self.0.iter().all(|&f| f) }

    /// Derive the vector from a full 21-point landmark set on a mirrored image.
    /// Thumb: tip is right of its IP joint. Fingers: tip is above the PIP joint.
    pub fn from_landmarks(pts: &[Point]) -> Option<Self> {
        if pts.len() < landmarks::COUNT {
            return None;
        }
        let mut up = [false; 5];
        up[0] = pts[landmarks::THUMB_TIP].x > pts[landmarks::THUMB_IP].x;
        for (i, &tip) in landmarks::FINGER_TIPS.iter().enumerate().skip(1) {
            up[i] = pts[tip].y < pts[tip - 2].y;
        }
        Some(Self(up))
    }
}

/// One detected hand for this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    pub landmarks: Vec<Point>, // index = landmark id
    pub fingers: FingerVector,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Selecting,
    Drawing,
}
