//! Image preprocessing: raw upload bytes -> `[1, 150, 150, 3]` tensor.
//!
//! - Decode with format sniffed from the content
//! - Convert to 8-bit RGB (alpha dropped, grayscale expanded)
//! - Resize to exactly 150x150 with nearest-neighbour sampling (no cropping)
//! - Scale every channel value into [0, 1] by dividing by 255
//! - Lay out as NHWC with a leading batch dimension of 1

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::Array4;

use crate::error::Result;

pub const INPUT_SIZE: u32 = 150;
pub const CHANNELS: usize = 3;

const RESIZE_FILTER: FilterType = FilterType::Nearest;

/// Decode an image from its encoded bytes.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Resize to the model's input size. Already-sized images are returned as-is.
pub fn resize(image: &DynamicImage) -> RgbImage {
    let rgb = image.to_rgb8();
    if rgb.dimensions() == (INPUT_SIZE, INPUT_SIZE) {
        return rgb;
    }
    image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, RESIZE_FILTER)
}

/// Normalize a 150x150 RGB image into a batched NHWC tensor.
pub fn to_batch(rgb: &RgbImage) -> Array4<f32> {
    let side = INPUT_SIZE as usize;
    Array4::from_shape_fn((1, side, side, CHANNELS), |(_, y, x, c)| {
        let pixel = rgb.get_pixel(x as u32, y as u32);
        pixel[c] as f32 / 255.0
    })
}

/// Full preprocessing for an already-decoded image.
pub fn image_to_batch(image: &DynamicImage) -> Array4<f32> {
    to_batch(&resize(image))
}

/// An all-zero batch, used to probe a model's output width.
pub fn zero_batch() -> Array4<f32> {
    let side = INPUT_SIZE as usize;
    Array4::zeros((1, side, side, CHANNELS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifyError;
    use image::{ImageBuffer, ImageFormat, Rgb, Rgba};
    use std::io::Cursor;

    fn checkerboard(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            if (x / 7 + y / 5) % 2 == 0 {
                Rgb([200u8, 40, 90])
            } else {
                Rgb([10u8, 220, 130])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn non_image_bytes_fail_to_decode() {
        let result = decode(b"GIF? no, just text");
        assert!(matches!(result, Err(ClassifyError::Decode(_))));
    }

    #[test]
    fn decodes_png_bytes() {
        let mut bytes = Vec::new();
        checkerboard(32, 20)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let image = decode(&bytes).unwrap();
        assert_eq!((image.width(), image.height()), (32, 20));
    }

    #[test]
    fn batch_has_model_input_shape() {
        let batch = image_to_batch(&checkerboard(640, 480));
        assert_eq!(batch.shape(), &[1, 150, 150, 3]);
    }

    #[test]
    fn tiny_images_are_upscaled_not_padded() {
        let img = ImageBuffer::from_pixel(3, 2, Rgb([255u8, 0, 0]));
        let batch = image_to_batch(&DynamicImage::ImageRgb8(img));

        assert_eq!(batch.shape(), &[1, 150, 150, 3]);
        assert!(batch.slice(ndarray::s![0, .., .., 0]).iter().all(|&v| v == 1.0));
        assert!(batch.slice(ndarray::s![0, .., .., 1]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn values_are_scaled_into_unit_range() {
        let img = ImageBuffer::from_pixel(150, 150, Rgb([128u8, 0, 255]));
        let batch = image_to_batch(&DynamicImage::ImageRgb8(img));

        assert!((batch[[0, 10, 10, 0]] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(batch[[0, 10, 10, 1]], 0.0);
        assert_eq!(batch[[0, 10, 10, 2]], 1.0);
        assert!(batch.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn alpha_channel_is_dropped() {
        let img = ImageBuffer::from_pixel(150, 150, Rgba([51u8, 102, 153, 0]));
        let batch = image_to_batch(&DynamicImage::ImageRgba8(img));

        assert_eq!(batch.shape(), &[1, 150, 150, 3]);
        assert!((batch[[0, 0, 0, 0]] - 0.2).abs() < 1e-6);
        assert!((batch[[0, 0, 0, 2]] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn resize_is_idempotent_on_presized_image() {
        let original = checkerboard(413, 287);
        let presized = DynamicImage::ImageRgb8(resize(&original));

        let once = image_to_batch(&presized);
        let twice = image_to_batch(&DynamicImage::ImageRgb8(resize(&presized)));

        assert_eq!(once.shape(), twice.shape());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
        assert_eq!(once, image_to_batch(&original));
    }

    #[test]
    fn preprocessing_is_deterministic() {
        let img = checkerboard(999, 333);
        assert_eq!(image_to_batch(&img), image_to_batch(&img));
    }
}
