// Hand landmark detection.
// The vision model runs outside this program. `ProcessDetector` starts it as
// a child process and speaks a line-oriented protocol over its pipes:
//   1) startup: the child prints `READY` on its own line;
//   2) per frame: we write `width`, `height`, `channels` (u32 little-endian)
//      followed by `width * height * 3` packed RGB bytes;
//   3) the child answers with one JSON line:
//      {"hands":[{"landmarks":[[x,y],...],"fingers":[true,...]}],"error":null}
//      where coordinates are pixels in the frame it was sent.
// `fingers` is optional; when absent it is derived from the landmarks.
// Landmarks are clamped to one frame's width/height beyond each edge, so a
// wild detector answer can only ever draw off-screen.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdout, Command, Stdio};

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::Error;
use crate::types::{FingerVector, FrameBuffer, Hand, Point};

/// Anything that can find a hand in a frame.
pub trait LandmarkSource {
    /// The first detected hand, if any.
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<Hand>, Error>;
}

#[derive(Deserialize, Debug)]
struct HandJson {
    landmarks: Vec<[f32; 2]>,
    #[serde(default)]
    fingers: Option<[bool; 5]>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Pixel coordinate from the detector, kept within `-extent..=2*extent`.
fn clamp_coord(v: f32, extent: usize) -> i32 {
    let lim = extent.min(i32::MAX as usize / 2) as f32;
    // NaN maps to 0 via the saturating cast
    v.round().clamp(-lim, 2.0 * lim) as i32
}

/// Decode one response line (for a `width` x `height` frame) into the first usable hand.
fn parse_response(line: &str, width: usize, height: usize) -> Result<Option<Hand>, Error> {
    let result: DetectionResult = serde_json::from_str(line)
        .map_err(|e| Error::Detector(format!("bad response {:?}: {e}", line.trim())))?;

    if let Some(error) = result.error {
        warn!("detector reported: {error}");
        return Ok(None);
    }

    let Some(hand) = result.hands.into_iter().next() else {
        return Ok(None);
    };
    let landmarks: Vec<Point> = hand
        .landmarks
        .iter()
        .map(|&[x, y]| Point::new(clamp_coord(x, width), clamp_coord(y, height)))
        .collect();
    let fingers = match hand.fingers {
        Some(f) => FingerVector(f),
        None => match FingerVector::from_landmarks(&landmarks) {
            Some(f) => f,
            None => {
                debug!("partial hand ({} landmarks) without finger states", landmarks.len());
                FingerVector::default()
            }
        },
    };
    Ok(Some(Hand { landmarks, fingers }))
}

/// Landmark detector running as a child process.
pub struct ProcessDetector {
    process: Child,
    stdout_reader: BufReader<ChildStdout>,
    rgb: Vec<u8>, // reused frame upload buffer
}

impl ProcessDetector {
    /// Start `command[0]` with the remaining arguments and wait for `READY`.
    pub fn spawn(command: &[String]) -> Result<Self, Error> {
        let (program, args) =
            command.split_first().ok_or_else(|| Error::Detector("empty detector command".into()))?;
        info!("starting hand detector: {}", command.join(" "));

        let mut process = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Detector(format!("spawn {program}: {e}")))?;

        let stdout = process.stdout.take().ok_or_else(|| Error::Detector("no stdout pipe".into()))?;
        let mut stdout_reader = BufReader::new(stdout);

        let mut ready = String::new();
        stdout_reader.read_line(&mut ready).map_err(|e| Error::Detector(e.to_string()))?;
        if ready.trim() != "READY" {
            let _ = process.kill();
            return Err(Error::Detector(format!("expected READY, got {:?}", ready.trim())));
        }
        info!("hand detector ready");

        Ok(Self { process, stdout_reader, rgb: Vec::new() })
    }
}

impl LandmarkSource for ProcessDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<Hand>, Error> {
        if frame.pixels.is_empty() {
            return Ok(None);
        }

        self.rgb.clear();
        for &px in &frame.pixels {
            self.rgb.extend_from_slice(&[(px >> 16) as u8, (px >> 8) as u8, px as u8]);
        }

        let stdin = self.process.stdin.as_mut().ok_or_else(|| Error::Detector("no stdin pipe".into()))?;
        let io = |e: std::io::Error| Error::Detector(e.to_string());
        stdin.write_all(&(frame.width as u32).to_le_bytes()).map_err(io)?;
        stdin.write_all(&(frame.height as u32).to_le_bytes()).map_err(io)?;
        stdin.write_all(&3u32.to_le_bytes()).map_err(io)?;
        stdin.write_all(&self.rgb).map_err(io)?;
        stdin.flush().map_err(io)?;

        let mut response = String::new();
        if self.stdout_reader.read_line(&mut response).map_err(io)? == 0 {
            return Err(Error::Detector("detector closed its output".into()));
        }
        parse_response(&response, frame.width, frame.height)
    }
}

impl Drop for ProcessDetector {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
