// Per-frame gesture interpretation.
// `Interpreter::step` turns the current hand (if any) into a `Step`: the
// frame's `Mode`, at most one stroke segment, an optional clear, and the
// transient overlays to draw on the live frame.
// Visual: index finger up draws, index + middle up picks a swatch from the
// header band, an open hand wipes the canvas.
// Tool state persists across frames inside the interpreter; everything in a
// `Step` is frame-local.

use log::{debug, info};

use crate::config::{Config, Zone};
use crate::types::{landmarks, Hand, Mode, Point, Rgb, Tool};

/// Fewer landmarks than this and the frame is treated as "no hand".
const MIN_LANDMARKS: usize = landmarks::MIDDLE_TIP + 1;
/// Vertical padding of the selection highlight around the two fingertips.
const HIGHLIGHT_PAD: i32 = 25;
/// Radius of the fingertip dot shown while drawing.
const CURSOR_RADIUS: i32 = 15;

/// A stroke piece to rasterise into the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub tool: Tool,
    pub thickness: i32,
}

/// Filled rectangle drawn on the live frame for one frame only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Highlight {
    pub a: Point,
    pub b: Point,
    pub color: Rgb,
}

/// Fingertip dot drawn on the live frame for one frame only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub at: Point,
    pub radius: i32,
    pub color: Rgb,
}

/// Everything one frame's gesture produces.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub mode: Mode,
    pub segment: Option<Segment>,
    /// Reset the canvas after `segment` is applied.
    pub clear: bool,
    pub highlight: Option<Highlight>,
    pub cursor: Option<Cursor>,
}

impl Step {
    pub fn idle() -> Self {
        Self { mode: Mode::Idle, segment: None, clear: false, highlight: None, cursor: None }
    }
}

/// Current tool plus the open end of the stroke in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolState {
    pub tool: Tool,
    /// Index into the header image list.
    pub header: usize,
    /// None = no active stroke.
    pub last_point: Option<Point>,
}

impl Default for ToolState {
    fn default() -> Self {
        Self { tool: Tool::Paint(Rgb::MAGENTA), header: 0, last_point: None }
    }
}

pub struct Interpreter {
    state: ToolState,
    zones: Vec<Zone>,
    band_height: i32,
    brush_thickness: i32,
    eraser_thickness: i32,
    last_mode: Mode,
}

impl Interpreter {
    pub fn new(config: &Config) -> Self {
        Self {
            state: ToolState::default(),
            zones: config.zones.clone(),
            band_height: config.band_height as i32,
            brush_thickness: config.brush_thickness,
            eraser_thickness: config.eraser_thickness,
            last_mode: Mode::Idle,
        }
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    fn thickness(&self, tool: Tool) -> i32 {
        match tool {
            Tool::Paint(_) => self.brush_thickness,
            Tool::Erase => self.eraser_thickness,
        }
    }

    /// First zone (table order) containing `x`.
    fn hit(&self, x: i32) -> Option<&Zone> {
        self.zones.iter().find(|z| z.contains(x))
    }

    /// Interpret one frame. `None` means no hand was detected.
    pub fn step(&mut self, hand: Option<&Hand>) -> Step {
        let step = match hand {
            Some(hand) if hand.landmarks.len() >= MIN_LANDMARKS => self.interpret(hand),
            _ => {
                self.state.last_point = None;
                Step::idle()
            }
        };

        if step.mode != self.last_mode {
            match step.mode {
                Mode::Selecting => debug!("Selection Mode"),
                Mode::Drawing => debug!("Drawing Mode"),
                Mode::Idle => debug!("Idle"),
            }
            self.last_mode = step.mode;
        }
        step
    }

    fn interpret(&mut self, hand: &Hand) -> Step {
        let tip = hand.landmarks[landmarks::INDEX_TIP];
        let middle = hand.landmarks[landmarks::MIDDLE_TIP];
        let fingers = hand.fingers;
        let mut step = Step::idle();

        if fingers.index() && fingers.middle() {
            step.mode = Mode::Selecting;
            self.state.last_point = None;

            if (0..self.band_height).contains(&tip.y) {
                if let Some(zone) = self.hit(tip.x).cloned() {
                    if zone.tool != self.state.tool || zone.header != self.state.header {
                        info!("selected {:?} (header {})", zone.tool, zone.header);
                    }
                    self.state.tool = zone.tool;
                    self.state.header = zone.header;
                }
            }

            step.highlight = Some(Highlight {
                a: Point::new(tip.x, tip.y.saturating_sub(HIGHLIGHT_PAD)),
                b: Point::new(middle.x, middle.y.saturating_add(HIGHLIGHT_PAD)),
                color: self.state.tool.color(),
            });
        } else if fingers.index() {
            step.mode = Mode::Drawing;
            let tool = self.state.tool;
            step.cursor = Some(Cursor { at: tip, radius: CURSOR_RADIUS, color: tool.color() });

            // The first sample of a stroke only anchors it.
            if let Some(from) = self.state.last_point {
                step.segment = Some(Segment { from, to: tip, tool, thickness: self.thickness(tool) });
            }
            self.state.last_point = Some(tip);
        } else {
            self.state.last_point = None;
        }

        if fingers.all() {
            info!("clear canvas");
            step.clear = true;
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{draw_transients, Canvas};
    use crate::compositor::Compositor;
    use crate::types::{FingerVector, FrameBuffer};

    const MAGENTA: u32 = 0x00FF_00FF;

    fn hand(fingers: [bool; 5], index: Point, middle: Point) -> Hand {
        let mut landmarks = vec![Point::new(640, 600); landmarks::COUNT];
        landmarks[landmarks::INDEX_TIP] = index;
        landmarks[landmarks::MIDDLE_TIP] = middle;
        Hand { landmarks, fingers: FingerVector(fingers) }
    }

    fn drawing(at: Point) -> Hand {
        hand([false, true, false, false, false], at, Point::new(at.x.saturating_add(40), at.y.saturating_add(80)))
    }

    fn selecting(at: Point) -> Hand {
        hand([false, true, true, false, false], at, Point::new(at.x.saturating_add(40), at.y))
    }

    fn open_hand(at: Point) -> Hand {
        hand([true; 5], at, Point::new(at.x.saturating_add(40), at.y))
    }

    fn interpreter() -> Interpreter {
        Interpreter::new(&Config::default())
    }

    #[test]
    fn first_drawing_sample_only_arms() {
        let mut it = interpreter();
        let step = it.step(Some(&drawing(Point::new(100, 200))));
        assert_eq!(step.mode, Mode::Drawing);
        assert_eq!(step.segment, None);
        assert_eq!(it.state().last_point, Some(Point::new(100, 200)));
        assert!(step.cursor.is_some());
    }

    #[test]
    fn consecutive_drawing_frames_emit_one_segment_each() {
        let mut it = interpreter();
        let pts = [Point::new(100, 200), Point::new(150, 250), Point::new(170, 260), Point::new(200, 300)];
        let mut segments = Vec::new();
        for p in pts {
            segments.extend(it.step(Some(&drawing(p))).segment);
        }
        assert_eq!(segments.len(), 3);
        for (seg, pair) in segments.iter().zip(pts.windows(2)) {
            assert_eq!((seg.from, seg.to), (pair[0], pair[1]));
            assert_eq!(seg.tool, Tool::Paint(Rgb::MAGENTA));
            assert_eq!(seg.thickness, 25);
        }
    }

    #[test]
    fn too_few_landmarks_is_idle_and_breaks_the_stroke() {
        let mut it = interpreter();
        it.step(Some(&drawing(Point::new(10, 300))));
        let mut short = drawing(Point::new(20, 300));
        short.landmarks.truncate(12);
        let step = it.step(Some(&short));
        assert_eq!(step, Step::idle());
        assert_eq!(it.state().last_point, None);
        assert_eq!(it.step(Some(&drawing(Point::new(30, 300)))).segment, None);
    }

    #[test]
    fn losing_the_hand_breaks_the_stroke() {
        let mut it = interpreter();
        it.step(Some(&drawing(Point::new(10, 300))));
        assert_eq!(it.step(None), Step::idle());
        assert_eq!(it.step(Some(&drawing(Point::new(500, 500)))).segment, None);
    }

    #[test]
    fn fist_is_idle_and_resets_last_point() {
        let mut it = interpreter();
        it.step(Some(&drawing(Point::new(10, 300))));
        let step = it.step(Some(&hand([false; 5], Point::new(10, 300), Point::new(20, 300))));
        assert_eq!(step.mode, Mode::Idle);
        assert_eq!(it.state().last_point, None);
    }

    #[test]
    fn extreme_fingertips_never_overflow_the_frame_loop() {
        let mut it = interpreter();
        let mut canvas = Canvas::new(1280, 720);
        let mut live = FrameBuffer::new(1280, 720);
        for _ in 0..2 {
            let step = it.step(Some(&drawing(Point::new(i32::MAX, 10))));
            canvas.apply(&step);
            draw_transients(&mut live, &step);
        }
        let step = it.step(Some(&hand(
            [false, true, true, false, false],
            Point::new(i32::MIN, i32::MIN),
            Point::new(i32::MAX, i32::MAX),
        )));
        assert_eq!(step.highlight.unwrap().a.y, i32::MIN);
        assert_eq!(step.highlight.unwrap().b.y, i32::MAX);
        draw_transients(&mut live, &step);
        assert!(canvas.is_blank());
    }

    #[test]
    fn selecting_inside_first_zone_picks_magenta() {
        let mut it = interpreter();
        it.step(Some(&selecting(Point::new(1100, 60))));
        assert_eq!(it.state().tool, Tool::Erase);
        let step = it.step(Some(&selecting(Point::new(300, 100))));
        assert_eq!(step.mode, Mode::Selecting);
        assert_eq!(it.state().tool, Tool::Paint(Rgb::MAGENTA));
        assert_eq!(it.state().header, 0);
    }

    #[test]
    fn selecting_outside_zones_keeps_the_tool() {
        let mut it = interpreter();
        it.step(Some(&selecting(Point::new(600, 60))));
        let before = it.state().clone();
        it.step(Some(&selecting(Point::new(500, 60)))); // gap between zones
        it.step(Some(&selecting(Point::new(300, 400)))); // below the band
        assert_eq!(it.state().tool, before.tool);
        assert_eq!(it.state().header, 1);
    }

    #[test]
    fn selecting_resets_stroke_and_highlights() {
        let mut it = interpreter();
        it.step(Some(&drawing(Point::new(100, 300))));
        let step = it.step(Some(&selecting(Point::new(100, 300))));
        assert_eq!(it.state().last_point, None);
        assert_eq!(step.segment, None);
        let hl = step.highlight.unwrap();
        assert_eq!(hl.a, Point::new(100, 275));
        assert_eq!(hl.b, Point::new(140, 325));
        assert_eq!(hl.color, Rgb::MAGENTA);
    }

    #[test]
    fn open_hand_clears_and_selects() {
        let mut it = interpreter();
        let step = it.step(Some(&open_hand(Point::new(600, 400))));
        assert!(step.clear);
        assert_eq!(step.mode, Mode::Selecting);
        assert!(step.highlight.is_some());
    }

    #[test]
    fn draw_then_open_hand_shows_only_live_video() {
        let config = Config::default();
        let mut it = Interpreter::new(&config);
        let mut canvas = Canvas::new(1280, 720);

        canvas.apply(&it.step(Some(&drawing(Point::new(100, 200)))));
        let step = it.step(Some(&drawing(Point::new(150, 250))));
        assert_eq!(
            step.segment,
            Some(Segment {
                from: Point::new(100, 200),
                to: Point::new(150, 250),
                tool: Tool::Paint(Rgb::MAGENTA),
                thickness: config.brush_thickness,
            })
        );
        canvas.apply(&step);
        assert_eq!(canvas.snapshot().get(125, 225), Some(MAGENTA));

        canvas.apply(&it.step(Some(&open_hand(Point::new(600, 400)))));
        assert!(canvas.is_blank());

        let live = FrameBuffer { width: 1280, height: 720, pixels: vec![0x0012_3456; 1280 * 720] };
        let out = Compositor::new(&config).compose(&live, canvas.snapshot(), None);
        assert_eq!(out.image, live);
    }

    #[test]
    fn eraser_zone_switches_to_eraser_thickness() {
        let mut it = interpreter();
        let step = it.step(Some(&selecting(Point::new(1100, 60))));
        assert_eq!(step.mode, Mode::Selecting);
        assert_eq!(it.state().tool, Tool::Erase);
        assert_eq!(it.state().header, 3);

        it.step(Some(&drawing(Point::new(400, 400))));
        let seg = it.step(Some(&drawing(Point::new(420, 420)))).segment.unwrap();
        assert_eq!(seg.tool, Tool::Erase);
        assert_eq!(seg.thickness, 100);
    }
}
