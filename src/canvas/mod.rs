pub mod image_buffer;

pub use image_buffer::{ImageBuffer, HEIGHT, PIXELS, WIDTH};
