use serde::Serialize;

use crate::data::dataset::Sample;
use crate::error::{Result, SynthError};

pub const WIDTH: usize = 28;
pub const HEIGHT: usize = 28;
pub const PIXELS: usize = WIDTH * HEIGHT;

/// The 28×28 grayscale canvas, row-major, every value clamped to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBuffer {
    pixels: Vec<f64>,
}

impl Default for ImageBuffer {
    fn default() -> Self {
        ImageBuffer::new()
    }
}

impl ImageBuffer {
    pub fn new() -> ImageBuffer {
        ImageBuffer { pixels: vec![0.0; PIXELS] }
    }

    /// Copies a dataset sample's image.
    pub fn from_sample(sample: &Sample) -> Result<ImageBuffer> {
        let mut buffer = ImageBuffer::new();
        buffer.load_pixels(&sample.image)?;
        Ok(buffer)
    }

    /// Decodes image bytes (PNG/JPEG/BMP/GIF), resizes to 28×28, converts to
    /// grayscale and normalizes to [0, 1].
    pub fn from_image_bytes(bytes: &[u8]) -> Result<ImageBuffer> {
        let img = image::load_from_memory(bytes).map_err(|e| SynthError::Image(e.to_string()))?;
        let resized = img.resize_exact(
            WIDTH as u32,
            HEIGHT as u32,
            image::imageops::FilterType::Lanczos3,
        );
        let gray = resized.to_luma8();
        let pixels = gray.pixels().map(|p| p.0[0] as f64 / 255.0).collect();
        Ok(ImageBuffer { pixels })
    }

    pub fn reset(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = 0.0);
    }

    /// Overwrites every pixel, clamping to [0, 1]. The buffer is untouched if
    /// the length is wrong.
    pub fn load_pixels(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != PIXELS {
            return Err(SynthError::InputSizeMismatch { got: values.len(), expected: PIXELS });
        }
        for (p, &v) in self.pixels.iter_mut().zip(values) {
            *p = v.clamp(0.0, 1.0);
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.pixels.get(index).copied()
    }

    pub fn at(&self, x: usize, y: usize) -> Option<f64> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        self.get(y * WIDTH + x)
    }

    /// Writes one pixel, clamped to [0, 1]. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: f64) {
        if let Some(p) = self.pixels.get_mut(index) {
            *p = value.clamp(0.0, 1.0);
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_blank() {
        let buf = ImageBuffer::new();
        assert_eq!(buf.len(), 784);
        assert!(buf.as_slice().iter().all(|&p| p == 0.0));
    }

    #[test]
    fn set_clamps() {
        let mut buf = ImageBuffer::new();
        buf.set(3, 1.7);
        buf.set(4, -0.2);
        assert_eq!(buf.get(3), Some(1.0));
        assert_eq!(buf.get(4), Some(0.0));
    }

    #[test]
    fn at_is_row_major() {
        let mut buf = ImageBuffer::new();
        buf.set(2 * WIDTH + 5, 0.25);
        assert_eq!(buf.at(5, 2), Some(0.25));
        assert_eq!(buf.at(28, 0), None);
    }

    #[test]
    fn wrong_length_leaves_buffer_unchanged() {
        let mut buf = ImageBuffer::new();
        buf.set(0, 0.5);
        assert!(buf.load_pixels(&[1.0; 10]).is_err());
        assert_eq!(buf.get(0), Some(0.5));
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut buf = ImageBuffer::new();
        buf.load_pixels(&vec![0.9; PIXELS]).unwrap();
        buf.reset();
        assert!(buf.as_slice().iter().all(|&p| p == 0.0));
    }

    #[test]
    fn decodes_png_to_28_by_28() {
        let img = image::GrayImage::from_pixel(56, 56, image::Luma([255u8]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();
        let buf = ImageBuffer::from_image_bytes(&bytes).unwrap();
        assert_eq!(buf.len(), PIXELS);
        assert!(buf.as_slice().iter().all(|&p| p > 0.99));
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        assert!(matches!(
            ImageBuffer::from_image_bytes(b"not an image"),
            Err(SynthError::Image(_))
        ));
    }
}
