// Runtime settings, read from an optional TOML file (see config.example.toml).
// Every key has a default, so an empty file runs the stock 1280x720 layout;
// unknown keys are rejected so a typo does not silently fall back to a default.
use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::Error;
use crate::types::{Rgb, Tool};

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub camera_index: u32,
    /// Requested capture size; the camera picks the closest mode it supports.
    pub width: u32,
    pub height: u32,
    /// Directory holding the selector header images.
    pub header_dir: String,
    /// Height of the selector band at the top of the frame.
    pub band_height: usize,
    pub brush_thickness: i32, // px, full stroke width
    pub eraser_thickness: i32,
    /// Canvas intensity above which a pixel counts as drawn.
    pub mask_threshold: u8,
    /// Also show the raw canvas and the inverse mask in their own windows.
    pub debug_views: bool,
    /// Landmark detector command line (program followed by arguments).
    pub detector: Vec<String>,
    #[serde(rename = "zone")]
    pub zones: Vec<Zone>,
}

/// One selector swatch in the header band. `min_x..max_x` is half-open.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Zone {
    pub min_x: i32,
    pub max_x: i32,
    pub tool: Tool,
    pub header: usize,
}

impl Zone {
    pub fn contains(&self, x: i32) -> bool {
        (self.min_x..self.max_x).contains(&x)
    }
}

/// Four swatches laid out for a 1280px wide header: magenta, blue, green, eraser.
pub fn default_zones() -> Vec<Zone> {
    vec![
        Zone { min_x: 250, max_x: 450, tool: Tool::Paint(Rgb::MAGENTA), header: 0 },
        Zone { min_x: 550, max_x: 750, tool: Tool::Paint(Rgb(0, 0, 255)), header: 1 },
        Zone { min_x: 800, max_x: 950, tool: Tool::Paint(Rgb(0, 255, 0)), header: 2 },
        Zone { min_x: 1050, max_x: 1200, tool: Tool::Erase, header: 3 },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: 0,
            width: 1280,
            height: 720,
            header_dir: "folders".into(),
            band_height: 125,
            brush_thickness: 25,
            eraser_thickness: 100,
            mask_threshold: 50,
            debug_views: false,
            detector: vec!["python3".into(), "hand_detect.py".into()],
            zones: default_zones(),
        }
    }
}

impl Config {
    pub fn load<A: AsRef<Path>>(path: A) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        // 1) A zero or negative stroke would draw nothing and look like a dead brush.
        if self.brush_thickness <= 0 || self.eraser_thickness <= 0 {
            return Err(Error::Config("thickness values must be positive".into()));
        }
        // 2) Zero-sized frames or bands cannot be captured or overlaid.
        if self.width == 0 || self.height == 0 || self.band_height == 0 {
            return Err(Error::Config("frame and band sizes must be non-zero".into()));
        }
        // 3) Zones: at least one, and each must cover some x. Overlap is allowed;
        //    the first matching zone wins.
        if self.zones.is_empty() {
            return Err(Error::Config("at least one [[zone]] is required".into()));
        }
        if let Some(z) = self.zones.iter().find(|z| z.min_x >= z.max_x) {
            return Err(Error::Config(format!("zone {}..{} is empty", z.min_x, z.max_x)));
        }
        // 4) Something to spawn as the landmark detector.
        if self.detector.is_empty() {
            return Err(Error::Config("`detector` needs at least a program name".into()));
        }
        Ok(())
    }

    /// Zones that reach past the right edge of a `width`-pixel frame. The camera
    /// may deliver less than the requested width, and the tail of such a zone
    /// can then never be pointed at.
    pub fn zones_beyond(&self, width: u32) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(move |z| i64::from(z.max_x) > i64::from(width))
    }
}
