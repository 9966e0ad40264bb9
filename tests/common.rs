#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Smooth gradient; compresses well.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    }))
}

/// Deterministic pseudo-random pixels; JPEG size reacts strongly to quality.
pub fn noise_image(width: u32, height: u32) -> DynamicImage {
    let mut state: u32 = 0x2545_f491;
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let base = ((x + y) % 256) as u8;
        Rgb([
            base.wrapping_add((state & 0x3f) as u8),
            base.wrapping_add(((state >> 8) & 0x3f) as u8),
            base.wrapping_add(((state >> 16) & 0x3f) as u8),
        ])
    }))
}

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

pub fn write_image(dir: &Path, name: &str, img: &DynamicImage, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    File::create(&path)
        .unwrap()
        .write_all(&encode(img, format))
        .unwrap();
    path
}

/// A directory with two real images, one corrupt "image" and a text file.
pub fn create_mixed_directory(dir: &Path) {
    write_image(dir, "a.png", &gradient_image(64, 48), ImageFormat::Png);
    write_image(dir, "b.jpg", &noise_image(40, 40), ImageFormat::Jpeg);
    File::create(dir.join("c.png"))
        .unwrap()
        .write_all(b"definitely not a png")
        .unwrap();
    File::create(dir.join("notes.txt"))
        .unwrap()
        .write_all(b"not an image")
        .unwrap();
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}
