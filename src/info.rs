use crate::config::CompressorConfig;
use crate::constants::{INFO_PREFIX, SUPPORTED_INPUT_FORMATS, SUPPORTED_OUTPUT_FORMATS};
use crate::error::{CompressionError, Result};
use crate::formats::MediaFormat;
use crate::processing::{detect_format, load_image};
use crate::stats::format_bytes;
use image::GenericImageView;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Facts about one decoded image.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub name: String,
    pub size: u64,
    pub formatted_size: String,
    pub width: u32,
    pub height: u32,
    pub format: MediaFormat,
    pub color_type: String,
    pub megapixels: f64,
    pub aspect_ratio: f64,
    pub suggestions: Vec<String>,
}

impl ImageInfo {
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self> {
        let img = load_image(bytes)?;
        let (width, height) = img.dimensions();
        let format = detect_format(bytes).unwrap_or_else(|| MediaFormat::Other(String::new()));
        let size = bytes.len() as u64;

        Ok(Self {
            name: name.to_string(),
            size,
            formatted_size: format_bytes(size),
            width,
            height,
            suggestions: suggestions(size, width, height, &format),
            format,
            color_type: format!("{:?}", img.color()),
            megapixels: (width as f64 * height as f64) / 1_000_000.0,
            aspect_ratio: width as f64 / height.max(1) as f64,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CompressionError::FileNotFound(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(&name, &fs::read(path)?)
    }
}

fn suggestions(size: u64, width: u32, height: u32, format: &MediaFormat) -> Vec<String> {
    let mut tips = Vec::new();

    tips.push(
        if size > 5 * 1024 * 1024 {
            "Large file (>5MB): consider high compression (quality 60-80)"
        } else if size > 1024 * 1024 {
            "Medium file (1-5MB): consider medium compression (quality 70-85)"
        } else {
            "Small file (<1MB): consider light compression (quality 85-95)"
        }
        .to_string(),
    );

    if width > 2048 || height > 2048 {
        tips.push(format!(
            "Larger than 2048x2048: output will be downscaled from {}x{}",
            width, height
        ));
    }

    tips.push(
        match format {
            MediaFormat::Png => "PNG: quality below 80 converts to JPEG under auto",
            MediaFormat::Jpeg => "JPEG: adjust quality for the size/quality balance",
            MediaFormat::WebP => "WebP: already well compressed, consider lowering quality",
            _ => "Other format: consider converting to JPEG or WebP",
        }
        .to_string(),
    );

    tips
}

/// Limits and formats the compressor accepts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatsInfo {
    pub supported: Vec<&'static str>,
    pub output: Vec<&'static str>,
    pub max_size: String,
    pub max_files: usize,
}

pub fn supported_formats(config: &CompressorConfig) -> FormatsInfo {
    FormatsInfo {
        supported: SUPPORTED_INPUT_FORMATS.to_vec(),
        output: SUPPORTED_OUTPUT_FORMATS.to_vec(),
        max_size: format_bytes(config.max_file_size),
        max_files: config.max_files,
    }
}

pub fn print_image_info(info: &ImageInfo) {
    println!("📊 Analyzing image: {}", info.name);
    println!("{} Basic Information:", INFO_PREFIX);
    println!("  📏 Dimensions: {}x{} pixels", info.width, info.height);
    println!("  📦 File size: {} ({} bytes)", info.formatted_size, info.size);
    println!("  🎨 Color type: {}", info.color_type);
    println!("  🎭 Image format: {}", info.format);
    println!("  🔢 Megapixels: {:.2} MP", info.megapixels);
    println!("  📐 Aspect ratio: {:.2}:1", info.aspect_ratio);

    println!("\n💡 Compression Suggestions:");
    for tip in &info.suggestions {
        println!("  🎯 {}", tip);
    }
}

pub fn print_formats(formats: &FormatsInfo) {
    println!("{} Supported formats:", INFO_PREFIX);
    println!("  Input:  {}", formats.supported.join(", "));
    println!("  Output: {}", formats.output.join(", "));
    println!("  Max file size: {}", formats.max_size);
    println!("  Max files per batch: {}", formats.max_files);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::new_rgba8(width, height)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_image_info_from_bytes() {
        let info = ImageInfo::from_bytes("wide.png", &png(300, 100)).unwrap();
        assert_eq!((info.width, info.height), (300, 100));
        assert_eq!(info.format, MediaFormat::Png);
        assert_eq!(info.aspect_ratio, 3.0);
        assert_eq!(info.color_type, "Rgba8");
        assert!(info.suggestions.iter().any(|s| s.starts_with("PNG")));
    }

    #[test]
    fn test_image_info_rejects_garbage() {
        assert!(ImageInfo::from_bytes("x.png", b"garbage").is_err());
    }

    #[test]
    fn test_supported_formats_document() {
        let value = serde_json::to_value(supported_formats(&CompressorConfig::default())).unwrap();
        assert_eq!(value["maxSize"], "10 MB");
        assert_eq!(value["maxFiles"], 20);
        assert_eq!(value["output"], serde_json::json!(["jpeg", "png", "webp"]));
        assert_eq!(value["supported"].as_array().unwrap().len(), 7);
    }
}
