use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba};
use tracing::debug;

use crate::error::{PictureError, Result};
use crate::video::types::Frame;

/// Where a scaled picture lands on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Scale a `src_w` x `src_h` picture to fit inside the canvas without
/// cropping, keeping its aspect ratio, and center it.
///
/// Pictures smaller than the canvas are scaled up.
pub fn fit_within(src_w: u32, src_h: u32, canvas_w: u32, canvas_h: u32) -> Placement {
    if src_w == 0 || src_h == 0 {
        return Placement { x: canvas_w / 2, y: canvas_h / 2, width: 0, height: 0 };
    }

    let scale = f64::min(
        canvas_w as f64 / src_w as f64,
        canvas_h as f64 / src_h as f64,
    );

    let width = ((src_w as f64 * scale).round() as u32).clamp(1, canvas_w);
    let height = ((src_h as f64 * scale).round() as u32).clamp(1, canvas_h);

    Placement {
        x: (canvas_w - width) / 2,
        y: (canvas_h - height) / 2,
        width,
        height,
    }
}

/// Fixed-size background every picture and slide is composited onto
#[derive(Debug, Clone, Copy)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        Self { width, height, background }
    }

    /// Composite a decoded picture onto a fresh canvas
    pub fn compose(&self, picture: &DynamicImage) -> Frame {
        let (src_w, src_h) = picture.dimensions();
        let placement = fit_within(src_w, src_h, self.width, self.height);
        let mut frame = Frame::new_filled(self.width, self.height, self.background);

        if placement.width == 0 || placement.height == 0 {
            return frame;
        }

        let scaled = if (src_w, src_h) == (placement.width, placement.height) {
            picture.to_rgba8()
        } else {
            image::imageops::resize(picture, placement.width, placement.height, FilterType::Lanczos3)
        };

        frame.paste(&self.flatten(&scaled), placement.x, placement.y);
        frame
    }

    /// Blend transparent pixels onto the background color
    fn flatten(&self, image: &image::RgbaImage) -> RgbImage {
        let bg = self.background;
        RgbImage::from_fn(image.width(), image.height(), |x, y| {
            let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
            let alpha = a as u32;
            let blend = |c: u8, bg: u8| ((c as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8;
            Rgb([blend(r, bg[0]), blend(g, bg[1]), blend(b, bg[2])])
        })
    }

    /// Decode `input`, composite it, and write the result as PNG to `output`
    pub fn composite_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<()> {
        let input = input.as_ref();
        let picture = image::open(input).map_err(|e| PictureError::LoadFailed {
            path: input.display().to_string(),
            reason: e.to_string(),
        })?;

        if picture.width() == 0 || picture.height() == 0 {
            return Err(PictureError::Empty { path: input.display().to_string() }.into());
        }

        debug!("Compositing {:?} ({}x{}) onto {}x{} canvas",
               input, picture.width(), picture.height(), self.width, self.height);

        self.compose(&picture).save_png(output)?;
        Ok(())
    }
}
