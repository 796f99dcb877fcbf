use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};

/// A `size` x `size` RGB image whose red channel encodes the row index.
pub fn row_coded_image(size: u32) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| Rgb([y as u8 * 40, x as u8, 200]))
}

/// Save `img` as a PNG called `name` inside `dir`.
pub fn write_png(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, ImageFormat::Png)
        .expect("failed to write test image");
    path
}

pub fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() <= 1e-4,
        "{what}: expected {expected}, got {actual}"
    );
}
