// The persistent drawing layer, plus the small software rasteriser it shares
// with the per-frame overlays (selection box, fingertip dot).
// Visual: whatever lands in `Canvas` stays on screen until the open-hand clear;
// the overlays drawn straight into the live frame vanish on the next frame.
// Every coordinate comes from the detector, so all box arithmetic saturates
// and everything is clipped to the buffer before a single pixel is touched.

use crate::gesture::{Cursor, Highlight, Segment, Step};
use crate::types::{FrameBuffer, Point, Rgb, Tool};

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Filled axis-aligned rectangle between two corners (any order, inclusive).
pub fn fill_rect(fb: &mut FrameBuffer, a: Point, b: Point, color: Rgb) {
    let c = color.packed();
    // Clip the box to the buffer; an off-screen box gives an empty range.
    let (x0, x1) = (a.x.min(b.x).max(0), a.x.max(b.x).min(fb.width as i32 - 1));
    let (y0, y1) = (a.y.min(b.y).max(0), a.y.max(b.y).min(fb.height as i32 - 1));
    for y in y0..=y1 {
        for x in x0..=x1 {
            put_pixel(fb, x, y, c);
        }
    }
}

/// Filled disc of `radius` pixels centered at `center`.
pub fn fill_disc(fb: &mut FrameBuffer, center: Point, radius: i32, color: Rgb) {
    thick_line(fb, center, center, radius.saturating_mul(2), color);
}

/// Line of the given thickness with round caps: every pixel whose center lies
/// within thickness/2 of the segment is filled.
pub fn thick_line(fb: &mut FrameBuffer, from: Point, to: Point, thickness: i32, color: Rgb) {
    if thickness <= 0 {
        return;
    }
    let c = color.packed();
    let r = thickness as f64 / 2.0;
    let r2 = r * r;
    let pad = r.ceil() as i32;

    // Scan just the bounding box, clipped to the buffer
    let x0 = from.x.min(to.x).saturating_sub(pad).max(0);
    let x1 = from.x.max(to.x).saturating_add(pad).min(fb.width as i32 - 1);
    let y0 = from.y.min(to.y).saturating_sub(pad).max(0);
    let y1 = from.y.max(to.y).saturating_add(pad).min(fb.height as i32 - 1);

    // Direction in f64: endpoints far apart must neither overflow i32 nor lose precision
    let (ax, ay) = (from.x as f64, from.y as f64);
    let (dx, dy) = (to.x as f64 - ax, to.y as f64 - ay);
    let len2 = dx * dx + dy * dy;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let (px, py) = (x as f64 - ax, y as f64 - ay);
            // Project onto the segment, clamped to its endpoints
            let t = if len2 > 0.0 { ((px * dx + py * dy) / len2).clamp(0.0, 1.0) } else { 0.0 };
            let (ex, ey) = (px - t * dx, py - t * dy);
            if ex * ex + ey * ey <= r2 {
                put_pixel(fb, x, y, c);
            }
        }
    }
}

/// Paint a frame's transient overlays onto the live image. Nothing here
/// reaches the canvas.
pub fn draw_transients(live: &mut FrameBuffer, step: &Step) {
    if let Some(Highlight { a, b, color }) = step.highlight {
        fill_rect(live, a, b, color);
    }
    if let Some(Cursor { at, radius, color }) = step.cursor {
        fill_disc(live, at, radius, color);
    }
    if let Some(Segment { from, to, tool, thickness }) = step.segment {
        thick_line(live, from, to, thickness, tool.color());
    }
}

/// Off-screen buffer that accumulates strokes for the lifetime of the process.
pub struct Canvas {
    buf: FrameBuffer,
}

impl Canvas {
    /// All-zero canvas matching the video resolution.
    pub fn new(width: usize, height: usize) -> Self {
        Self { buf: FrameBuffer::new(width, height) }
    }

    pub fn draw_segment(&mut self, from: Point, to: Point, tool: Tool, thickness: i32) {
        thick_line(&mut self.buf, from, to, thickness, tool.color());
    }

    pub fn clear(&mut self) {
        self.buf.pixels.fill(0);
    }

    pub fn snapshot(&self) -> &FrameBuffer {
        &self.buf
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.buf.pixels.iter().all(|&p| p == 0)
    }

    /// Commit one interpreted frame: the segment first, then a clear, so a
    /// clear always wins for that frame.
    pub fn apply(&mut self, step: &Step) {
        if let Some(Segment { from, to, tool, thickness }) = step.segment {
            self.draw_segment(from, to, tool, thickness);
        }
        if step.clear {
            self.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAGENTA: u32 = 0x00FF_00FF;

    #[test]
    fn segment_covers_its_body_and_caps() {
        let mut canvas = Canvas::new(400, 400);
        canvas.draw_segment(Point::new(100, 200), Point::new(150, 250), Tool::Paint(Rgb::MAGENTA), 25);
        let fb = canvas.snapshot();
        assert_eq!(fb.get(125, 225), Some(MAGENTA));
        assert_eq!(fb.get(133, 217), Some(MAGENTA)); // ~11px off the axis
        assert_eq!(fb.get(137, 213), Some(0)); // ~17px off the axis
        assert_eq!(fb.get(88, 200), Some(MAGENTA)); // round cap
        assert_eq!(fb.get(86, 200), Some(0));
    }

    #[test]
    fn segment_is_clipped_to_the_buffer() {
        let mut canvas = Canvas::new(50, 50);
        canvas.draw_segment(Point::new(-20, -20), Point::new(10, 10), Tool::Paint(Rgb::MAGENTA), 10);
        assert_eq!(canvas.snapshot().get(0, 0), Some(MAGENTA));
        assert_eq!(canvas.snapshot().pixels.len(), 2500);
    }

    #[test]
    fn extreme_coordinates_draw_nothing_and_do_not_overflow() {
        let mut canvas = Canvas::new(64, 64);
        let far = Point::new(i32::MAX, 10);
        canvas.draw_segment(far, far, Tool::Paint(Rgb::MAGENTA), 25);
        canvas.draw_segment(Point::new(i32::MIN, i32::MIN), Point::new(i32::MIN, 5), Tool::Erase, 100);
        assert!(canvas.is_blank());

        let mut live = FrameBuffer::new(64, 64);
        fill_rect(&mut live, Point::new(i32::MAX, i32::MIN), Point::new(i32::MAX, i32::MAX), Rgb::MAGENTA);
        fill_disc(&mut live, Point::new(i32::MIN, 0), i32::MAX, Rgb::MAGENTA);
        assert!(live.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn segment_from_far_off_screen_still_crosses_the_buffer() {
        let mut canvas = Canvas::new(64, 64);
        canvas.draw_segment(Point::new(i32::MIN, 32), Point::new(i32::MAX, 32), Tool::Paint(Rgb::MAGENTA), 4);
        assert_eq!(canvas.snapshot().get(10, 32), Some(MAGENTA));
        assert_eq!(canvas.snapshot().get(10, 40), Some(0));
    }

    #[test]
    fn erase_removes_paint() {
        let mut canvas = Canvas::new(200, 200);
        canvas.draw_segment(Point::new(20, 100), Point::new(180, 100), Tool::Paint(Rgb::MAGENTA), 25);
        canvas.draw_segment(Point::new(100, 50), Point::new(100, 150), Tool::Erase, 100);
        assert_eq!(canvas.snapshot().get(100, 100), Some(0));
        assert_eq!(canvas.snapshot().get(20, 100), Some(MAGENTA));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut canvas = Canvas::new(64, 64);
        canvas.draw_segment(Point::new(0, 0), Point::new(63, 63), Tool::Paint(Rgb(9, 9, 9)), 5);
        assert!(!canvas.is_blank());
        canvas.clear();
        let once = canvas.snapshot().clone();
        canvas.clear();
        assert_eq!(&once, canvas.snapshot());
        assert!(canvas.is_blank());
    }

    #[test]
    fn clear_wins_over_a_queued_segment() {
        let mut canvas = Canvas::new(64, 64);
        let step = Step {
            segment: Some(Segment {
                from: Point::new(5, 5),
                to: Point::new(40, 40),
                tool: Tool::Paint(Rgb::MAGENTA),
                thickness: 4,
            }),
            clear: true,
            ..Step::idle()
        };
        canvas.apply(&step);
        assert!(canvas.is_blank());
    }

    #[test]
    fn transients_draw_the_cursor_dot() {
        let mut live = FrameBuffer::new(100, 100);
        let step = Step {
            cursor: Some(Cursor { at: Point::new(50, 50), radius: 5, color: Rgb(0, 255, 0) }),
            ..Step::idle()
        };
        draw_transients(&mut live, &step);
        assert_eq!(live.get(50, 50), Some(0x0000_FF00));
        assert_eq!(live.get(50, 56), Some(0));
    }

    #[test]
    fn rect_and_disc_fill() {
        let mut fb = FrameBuffer::new(20, 20);
        fill_rect(&mut fb, Point::new(15, 15), Point::new(5, 5), Rgb(0, 0, 1));
        assert_eq!(fb.get(5, 5), Some(1));
        assert_eq!(fb.get(15, 15), Some(1));
        assert_eq!(fb.get(16, 15), Some(0));
        let mut fb = FrameBuffer::new(20, 20);
        fill_disc(&mut fb, Point::new(10, 10), 3, Rgb(0, 0, 1));
        assert_eq!(fb.get(13, 10), Some(1));
        assert_eq!(fb.get(13, 13), Some(0));
    }
}
