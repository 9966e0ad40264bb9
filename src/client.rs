//! Local fallback path: a transcoder that only uses raster primitives, and the
//! session state a client-side compressor keeps between user actions.
use crate::config::CompressorConfig;
use crate::constants::DOWNLOAD_PREFIX;
use crate::error::{CompressionError, Result};
use crate::files::write_output;
use crate::formats::{MediaFormat, OutputFormat, RequestedFormat};
use crate::models::{CompressionRequest, CompressionResult, ImageAsset, ItemFailure};
use crate::policy::TranscodePolicy;
use crate::processing::{
    encode_jpeg, encode_webp, encode_with_fallback, load_image, process_image_pipeline, resize_image,
    TranscodeOutput, Transcoder,
};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Decode to an RGBA raster, scale it, and export with the built-in encoders.
///
/// Formats the raster encoders cannot write come out as PNG. JPEG is baseline
/// and WebP is lossy at the requested quality; PNG ignores quality.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterTranscoder;

impl Transcoder for RasterTranscoder {
    fn name(&self) -> &'static str {
        "raster"
    }

    fn transcode(&self, bytes: &[u8], policy: &TranscodePolicy) -> Result<TranscodeOutput> {
        let decoded = load_image(bytes)?;
        let (source_width, source_height) = decoded.dimensions();
        let mut raster = DynamicImage::ImageRgba8(decoded.to_rgba8());

        resize_image(&mut raster, policy.max_width, policy.max_height, FilterType::Triangle);

        let target = policy.output_format.as_output().unwrap_or(OutputFormat::Png);
        let (encoded, format) =
            encode_with_fallback(&raster, &MediaFormat::from(target), |img, format| {
                export_raster(img, format, policy.quality)
            })?;

        Ok(TranscodeOutput {
            bytes: encoded,
            format,
            width: raster.width(),
            height: raster.height(),
            source_width,
            source_height,
        })
    }
}

fn export_raster(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(img, quality),
        OutputFormat::Png => write_with(img, ImageFormat::Png),
        OutputFormat::WebP => encode_webp(img, quality),
    }
}

fn write_with(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format)?;
    Ok(buffer.into_inner())
}

/// State of one interactive compression session.
#[derive(Debug, Clone)]
pub struct ClientSession {
    config: CompressorConfig,
    files: Vec<ImageAsset>,
    quality: u8,
    results: Vec<CompressionResult>,
    failures: Vec<ItemFailure>,
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new(CompressorConfig::default())
    }
}

impl ClientSession {
    pub fn new(config: CompressorConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
            quality: config.default_quality,
            results: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Replaces the selection with the image files among `files`.
    /// Returns how many were kept.
    pub fn select_files(&mut self, files: Vec<ImageAsset>) -> Result<usize> {
        let offered = files.len();
        let images: Vec<ImageAsset> = files.into_iter().filter(ImageAsset::is_image).collect();
        if images.is_empty() {
            return Err(CompressionError::NoFiles);
        }
        if images.len() < offered {
            debug!("Skipped {} non-image file(s)", offered - images.len());
        }

        self.files = images;
        self.results.clear();
        self.failures.clear();
        Ok(self.files.len())
    }

    /// Drops one selected file. Removing the last one resets the session.
    pub fn remove_file(&mut self, index: usize) -> Option<ImageAsset> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);
        if self.files.is_empty() {
            self.reset();
        }
        Some(removed)
    }

    pub fn set_quality(&mut self, quality: u8) -> Result<()> {
        CompressionRequest::new(quality, RequestedFormat::Auto)?;
        self.quality = quality;
        Ok(())
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn files(&self) -> &[ImageAsset] {
        &self.files
    }

    pub fn results(&self) -> &[CompressionResult] {
        &self.results
    }

    pub fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }

    /// Compresses the selection one file at a time. A failing file is
    /// recorded and skipped.
    pub fn compress_all(&mut self, transcoder: &dyn Transcoder) -> Result<&[CompressionResult]> {
        if self.files.is_empty() {
            return Err(CompressionError::NoFiles);
        }

        let request = CompressionRequest::new(self.quality, RequestedFormat::Auto)?;
        let settings = request.encoder_settings();
        self.results.clear();
        self.failures.clear();

        let total = self.files.len();
        for (index, asset) in self.files.iter().enumerate() {
            debug!("[{}/{}] compressing {}", index + 1, total, asset.name());
            match process_image_pipeline(asset, &request, settings, &self.config, transcoder) {
                Ok(result) => self.results.push(result),
                Err(e) => {
                    warn!("Failed to compress {}: {}", asset.name(), e);
                    self.failures.push(ItemFailure {
                        index,
                        original_name: asset.name().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!("Compressed {}/{} file(s)", self.results.len(), total);
        Ok(&self.results)
    }

    /// Writes every result into `dir`, pausing `delay` between writes.
    pub fn save_all(&self, dir: &Path, delay: Duration) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.results.len());
        for (i, result) in self.results.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                thread::sleep(delay);
            }
            written.push(write_output(dir, &download_name(result), &result.output_bytes)?);
        }
        Ok(written)
    }

    pub fn reset(&mut self) {
        self.files.clear();
        self.results.clear();
        self.failures.clear();
        self.quality = self.config.default_quality;
    }
}

/// `compressed_<stem>.<ext>` where the extension follows the produced format.
pub fn download_name(result: &CompressionResult) -> String {
    let stem = Path::new(&result.original_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| result.original_name.clone());
    format!(
        "{}{}.{}",
        DOWNLOAD_PREFIX,
        stem,
        result.output_format.extension()
    )
}
