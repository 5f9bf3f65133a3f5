use image::{imageops, ImageBuffer, Rgb, RgbImage};
use std::path::Path;

/// A single movie frame
///
/// Thin wrapper around an RGB image buffer; every frame of a movie shares the
/// canvas size so the encoder sees a uniform sequence.
#[derive(Clone, Debug)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgb(color));
        Self { buffer }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Paste `image` with its top-left corner at (`x`, `y`)
    pub fn paste(&mut self, image: &RgbImage, x: u32, y: u32) {
        imageops::replace(&mut self.buffer, image, x as i64, y as i64);
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save_with_format(path, image::ImageFormat::Png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paste_inside_frame() {
        let mut frame = Frame::new_filled(4, 4, [0, 0, 0]);
        let patch = ImageBuffer::from_pixel(2, 2, Rgb([255, 0, 0]));
        frame.paste(&patch, 1, 1);

        assert_eq!(frame.get_pixel(0, 0), [0, 0, 0]);
        assert_eq!(frame.get_pixel(1, 1), [255, 0, 0]);
        assert_eq!(frame.get_pixel(2, 2), [255, 0, 0]);
        assert_eq!(frame.get_pixel(3, 3), [0, 0, 0]);
    }
}
