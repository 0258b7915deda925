// Loads the selector header images shown in the top band.

use std::fs;
use std::path::Path;

use image::imageops::FilterType;
use log::{info, warn};

use crate::error::Error;
use crate::types::FrameBuffer;

/// Convert any decoded image into a 0x00RRGGBB buffer.
pub fn to_frame(img: &image::RgbImage) -> FrameBuffer {
    let (w, h) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect();
    FrameBuffer { width: w as usize, height: h as usize, pixels }
}

/// Every readable image in `dir`, sorted by file name and stretched to
/// `width` x `band_height`. Unreadable entries are skipped; an empty result
/// is an error.
pub fn load_headers(dir: &Path, width: u32, band_height: u32) -> Result<Vec<FrameBuffer>, Error> {
    let entries = fs::read_dir(dir).map_err(|e| Error::NoHeaders(format!("{}: {e}", dir.display())))?;
    let mut paths: Vec<_> = entries.filter_map(|e| e.ok()).map(|e| e.path()).filter(|p| p.is_file()).collect();
    paths.sort();

    let mut headers = Vec::with_capacity(paths.len());
    for path in paths {
        match image::open(&path) {
            Ok(img) => {
                let img = img.resize_exact(width, band_height, FilterType::Triangle).to_rgb8();
                headers.push(to_frame(&img));
            }
            Err(e) => warn!("Failed to load image {}: {e}", path.display()),
        }
    }

    if headers.is_empty() {
        return Err(Error::NoHeaders(dir.display().to_string()));
    }
    info!("loaded {} header image(s) from {}", headers.len(), dir.display());
    Ok(headers)
}
