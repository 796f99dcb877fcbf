mod common;

use diorama::resources::load_pixels;

use crate::common::test_utils::{row_coded_image, write_png};

#[tokio::test]
async fn rgb_image_is_flipped_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let original = row_coded_image(4);
    let path = write_png(dir.path(), "rows.png", &original);

    let pixels = load_pixels(&path).await.unwrap();

    assert_eq!((pixels.width, pixels.height, pixels.channels), (4, 4, 3));
    let last_row: Vec<u8> = (0..4).flat_map(|x| original.get_pixel(x, 3).0).collect();
    let first_row: Vec<u8> = (0..4).flat_map(|x| original.get_pixel(x, 0).0).collect();
    assert_eq!(pixels.row(0), last_row.as_slice());
    assert_eq!(pixels.row(3), first_row.as_slice());
}

#[tokio::test]
async fn white_image_stays_white() {
    let dir = tempfile::tempdir().unwrap();
    let white = image::RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255]));
    let path = write_png(dir.path(), "white.png", &white);

    let pixels = load_pixels(&path).await.unwrap();

    assert!(pixels.pixels.iter().all(|&p| p == 255));
    assert_eq!(pixels.pixels.len(), 4 * 4 * 3);
}

#[tokio::test]
async fn missing_file_fails_with_its_name() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_pixels(&dir.path().join("Sky3.jpg")).await.unwrap_err();
    assert!(format!("{err:#}").contains("Sky3.jpg"));
}

#[tokio::test]
async fn grayscale_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.png");
    image::GrayImage::from_pixel(2, 2, image::Luma([9])).save(&path).unwrap();

    let err = load_pixels(&path).await.unwrap_err();
    assert!(err.to_string().starts_with("unsupported channel count 1"));
}
