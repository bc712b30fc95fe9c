//! Shared raster canvas for layer compositing.
//!
//! The canvas maps board millimeters to pixels, flips Y so that board-min
//! is at the bottom-left, and mirrors X for bottom-side renders so the
//! board is shown as physically viewed from that face.

use image::{Rgba, RgbaImage};

use crate::models::BoundingBox;
use crate::theme::RgbColor;

/// Raster canvas sized to the board outline plus a margin.
pub struct Canvas {
    img: RgbaImage,
    /// Pixels per millimeter
    scale: f64,
    /// Board-space mm corresponding to the left/bottom canvas edge
    origin_x: f64,
    origin_y: f64,
    /// Mirror X (bottom-side view)
    mirrored: bool,
}

impl Canvas {
    /// Creates a canvas covering `bbox_mm` plus `margin_mm` on every edge,
    /// scaled so the image is exactly `width_px` pixels wide.
    #[must_use]
    pub fn new(
        bbox_mm: BoundingBox,
        margin_mm: f64,
        width_px: u32,
        background: RgbColor,
        mirrored: bool,
    ) -> Self {
        let span_x = bbox_mm.width() + 2.0 * margin_mm;
        let span_y = bbox_mm.height() + 2.0 * margin_mm;
        let scale = f64::from(width_px) / span_x;
        let height_px = ((span_y * scale).ceil() as u32).max(1);

        let bg = Rgba([background.r, background.g, background.b, 255]);
        let img = RgbaImage::from_pixel(width_px.max(1), height_px, bg);

        Self {
            img,
            scale,
            origin_x: bbox_mm.min_x - margin_mm,
            origin_y: bbox_mm.min_y - margin_mm,
            mirrored,
        }
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.img.width()
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Board mm → pixel coordinates (f64, center-of-pixel space).
    fn to_px(&self, x_mm: f64, y_mm: f64) -> (f64, f64) {
        let mut px = (x_mm - self.origin_x) * self.scale;
        if self.mirrored {
            px = f64::from(self.img.width()) - px;
        }
        // Flip Y: board min_y maps to the bottom row
        let py = f64::from(self.img.height()) - (y_mm - self.origin_y) * self.scale;
        (px, py)
    }

    fn blend(&mut self, px: i64, py: i64, color: RgbColor, alpha: f32) {
        if px < 0 || py < 0 || px >= i64::from(self.img.width()) || py >= i64::from(self.img.height())
        {
            return;
        }
        let pixel = self.img.get_pixel_mut(px as u32, py as u32);
        let a = alpha.clamp(0.0, 1.0);
        for (dst, src) in pixel.0[..3].iter_mut().zip([color.r, color.g, color.b]) {
            let blended = f32::from(*dst).mul_add(1.0 - a, f32::from(src) * a);
            *dst = blended.round().clamp(0.0, 255.0) as u8;
        }
        pixel.0[3] = 255;
    }

    /// Fills a disc centered at (`x_mm`, `y_mm`).
    pub fn fill_disc(&mut self, x_mm: f64, y_mm: f64, dia_mm: f64, color: RgbColor, alpha: f32) {
        let (cx, cy) = self.to_px(x_mm, y_mm);
        let r = (dia_mm / 2.0 * self.scale).max(0.5);
        let r2 = r * r;
        for py in (cy - r).floor() as i64..=(cy + r).ceil() as i64 {
            for px in (cx - r).floor() as i64..=(cx + r).ceil() as i64 {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    /// Fills an axis-aligned rectangle centered at (`x_mm`, `y_mm`).
    pub fn fill_rect(
        &mut self,
        x_mm: f64,
        y_mm: f64,
        w_mm: f64,
        h_mm: f64,
        color: RgbColor,
        alpha: f32,
    ) {
        let (cx, cy) = self.to_px(x_mm, y_mm);
        let hw = (w_mm / 2.0 * self.scale).max(0.5);
        let hh = (h_mm / 2.0 * self.scale).max(0.5);
        for py in (cy - hh).floor() as i64..=(cy + hh).ceil() as i64 {
            for px in (cx - hw).floor() as i64..=(cx + hw).ceil() as i64 {
                if (px as f64 + 0.5 - cx).abs() <= hw && (py as f64 + 0.5 - cy).abs() <= hh {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    /// Strokes a line with round caps by stamping discs along the segment.
    pub fn stroke_line(
        &mut self,
        x1_mm: f64,
        y1_mm: f64,
        x2_mm: f64,
        y2_mm: f64,
        width_mm: f64,
        color: RgbColor,
        alpha: f32,
    ) {
        let len_mm = ((x2_mm - x1_mm).powi(2) + (y2_mm - y1_mm).powi(2)).sqrt();
        // Step at quarter-pixel granularity so the stroke has no gaps
        let step_mm = (0.25 / self.scale).max(1e-6);
        let steps = (len_mm / step_mm).ceil() as usize;
        if steps == 0 {
            self.fill_disc(x1_mm, y1_mm, width_mm, color, alpha);
            return;
        }
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = x1_mm + (x2_mm - x1_mm) * t;
            let y = y1_mm + (y2_mm - y1_mm) * t;
            self.fill_disc(x, y, width_mm, color, alpha);
        }
    }

    /// Encodes the canvas as PNG.
    pub fn into_png(self) -> Result<Vec<u8>, image::ImageError> {
        let mut out = std::io::Cursor::new(Vec::new());
        self.img
            .write_to(&mut out, image::ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// Raw pixel access for tests.
    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.img.get_pixel(x, y).0
    }
}
