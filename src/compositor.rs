// Merges the persistent canvas into the live frame with a threshold mask,
// then pastes the selector header over the top band.
// Visual expectation: strokes look painted onto the video, unpainted areas show
// the camera untouched, and the active swatch sits across the top of the frame.

use log::debug;

use crate::config::Config;
use crate::types::FrameBuffer;

const WHITE: u32 = 0x00FF_FFFF;

/// Output of one compose pass.
pub struct Composite {
    /// What the user sees.
    pub image: FrameBuffer,
    /// Inverse mask: white = live video passes, black = canvas shows.
    pub mask: FrameBuffer,
}

/// Luma of a packed 0x00RRGGBB pixel (BT.601 weights), rounded.
#[inline]
fn gray(px: u32) -> u8 {
    let r = ((px >> 16) & 0xFF) as u32;
    let g = ((px >> 8) & 0xFF) as u32;
    let b = (px & 0xFF) as u32;
    // Fixed-point 0.299 / 0.587 / 0.114 with rounding
    ((r * 4899 + g * 9617 + b * 1868 + 8192) >> 14) as u8
}

pub struct Compositor {
    threshold: u8,
    band_height: usize,
}

impl Compositor {
    pub fn new(config: &Config) -> Self {
        Self { threshold: config.mask_threshold, band_height: config.band_height }
    }

    /// Inverse mask pixel for one canvas pixel.
    #[inline]
    fn mask_of(&self, canvas_px: u32) -> u32 {
        if gray(canvas_px) > self.threshold { 0 } else { WHITE }
    }

    /// Drawn canvas pixels replace the live video, everything else passes
    /// through unchanged. Canvas pixels too dark to cross the threshold are
    /// OR-ed over the video instead of replacing it.
    pub fn compose(&self, live: &FrameBuffer, canvas: &FrameBuffer, header: Option<&FrameBuffer>) -> Composite {
        // 1) Start from the live frame; the mask starts black and is filled per pixel.
        let mut image = live.clone();
        let mut mask = FrameBuffer::new(live.width, live.height);

        // 2) Gray + threshold + invert per canvas pixel, then (live & mask) | canvas.
        //    Visual: painted pixels punch a hole in the video and fill it with paint.
        if canvas.width == live.width && canvas.height == live.height {
            for ((out, m), &c) in image.pixels.iter_mut().zip(mask.pixels.iter_mut()).zip(&canvas.pixels) {
                *m = self.mask_of(c);
                *out = (*out & *m) | c;
            }
        } else {
            // Size mismatch: plain video rather than scrambled paint.
            debug!(
                "canvas {}x{} does not match frame {}x{}; showing live video",
                canvas.width, canvas.height, live.width, live.height
            );
            mask.pixels.fill(WHITE);
        }

        // 3) Header band last so no stroke can cover the selector.
        if let Some(header) = header {
            self.overlay_header(&mut image, header);
        }
        Composite { image, mask }
    }

    /// Copy the header into rows 0..band_height; skipped unless sizes match exactly.
    pub fn overlay_header(&self, image: &mut FrameBuffer, header: &FrameBuffer) {
        if header.width != image.width || header.height != self.band_height || image.height < self.band_height {
            debug!("header {}x{} does not fit the band; skipped", header.width, header.height);
            return;
        }
        // Same width, so the band is one contiguous run at the top of the buffer
        let n = header.width * header.height;
        image.pixels[..n].copy_from_slice(&header.pixels);
    }
}
