use crate::config::CompressorConfig;
use crate::constants::{OXIPNG_PRESET, PNG_COMPRESSION_LEVEL};
use crate::error::{CompressionError, Result};
use crate::formats::{MediaFormat, OutputFormat};
use crate::models::{CompressionRequest, CompressionResult, ImageAsset};
use crate::policy::{
    decide_output_format, derive_output_name, fit_within, EncoderSettings, PngEffort,
    TranscodePolicy,
};
use crate::validation::validate_asset;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageEncoder, ImageReader};
use mozjpeg::{ColorSpace, Compress};
use oxipng::{optimize_from_memory, Deflaters, Options, StripChunks};
use std::io::Cursor;
use std::num::NonZeroU8;
use std::panic;
use tracing::{debug, warn};

/// Encoded image plus the facts the reports need about both sides.
#[derive(Debug, Clone)]
pub struct TranscodeOutput {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub source_width: u32,
    pub source_height: u32,
}

/// Bytes in, smaller bytes out. Implementations must be interchangeable:
/// same policy semantics, same error kinds.
pub trait Transcoder: Send + Sync {
    fn name(&self) -> &'static str;

    fn transcode(&self, bytes: &[u8], policy: &TranscodePolicy) -> Result<TranscodeOutput>;
}

/// The library-backed executor: `image` for decode/resize, mozjpeg for
/// progressive JPEG, `oxipng` for PNG, `webp` for lossy WebP.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTranscoder;

impl Transcoder for ImageTranscoder {
    fn name(&self) -> &'static str {
        "image"
    }

    fn transcode(&self, bytes: &[u8], policy: &TranscodePolicy) -> Result<TranscodeOutput> {
        let mut img = load_image(bytes)?;
        let (source_width, source_height) = img.dimensions();

        resize_image(&mut img, policy.max_width, policy.max_height, FilterType::Lanczos3);

        let (encoded, format) = encode_with_fallback(&img, &policy.output_format, |img, format| {
            encode_image(img, format, &policy.settings)
        })?;

        Ok(TranscodeOutput {
            bytes: encoded,
            format,
            width: img.width(),
            height: img.height(),
            source_width,
            source_height,
        })
    }
}

/// Sniffs the container format from the leading bytes.
pub fn detect_format(bytes: &[u8]) -> Option<MediaFormat> {
    image::guess_format(bytes)
        .ok()
        .map(MediaFormat::from_image_format)
}

/// Decodes an in-memory image, rejecting anything the decoders don't know.
///
/// # Arguments
/// * `bytes` - Encoded image data; the container format is sniffed from it
///
/// # Returns
/// * `Ok(image)` - The decoded image at its original size
/// * `Err(CompressionError::ImageProcessing)` - If the data is not a decodable image
pub fn load_image(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let img = reader.decode()?;
    debug!("Decoded {}x{} image ({:?})", img.width(), img.height(), img.color());
    Ok(img)
}

/// Shrinks `img` in place to fit the bounds. Returns whether it changed.
pub fn resize_image(img: &mut DynamicImage, max_width: u32, max_height: u32, filter: FilterType) -> bool {
    let (width, height) = img.dimensions();
    let (new_width, new_height) = fit_within(width, height, max_width, max_height);
    if (new_width, new_height) == (width, height) {
        return false;
    }

    debug!(
        "Resizing {}x{} -> {}x{}",
        width, height, new_width, new_height
    );
    *img = img.resize_exact(new_width, new_height, filter);
    true
}

/// Encodes to `target`, retrying once as JPEG when a non-JPEG encode fails.
/// If the retry fails too, the first error is returned.
pub fn encode_with_fallback<F>(
    img: &DynamicImage,
    target: &MediaFormat,
    encode: F,
) -> Result<(Vec<u8>, OutputFormat)>
where
    F: Fn(&DynamicImage, OutputFormat) -> Result<Vec<u8>>,
{
    let output = target.as_output();
    let first_attempt = match output {
        Some(format) => encode(img, format).map(|bytes| (bytes, format)),
        None => Err(CompressionError::UnsupportedOutputFormat(target.to_string())),
    };

    match first_attempt {
        Ok(encoded) => Ok(encoded),
        Err(err) if output == Some(OutputFormat::Jpeg) => Err(err),
        Err(err) => {
            warn!("Encoding as {} failed ({}), retrying as JPEG", target, err);
            encode(img, OutputFormat::Jpeg)
                .map(|bytes| (bytes, OutputFormat::Jpeg))
                .map_err(|fallback_err| {
                    debug!("JPEG fallback failed as well: {}", fallback_err);
                    err
                })
        }
    }
}

/// Encodes `img` as `format` with the codec branch of `settings`.
///
/// # Arguments
/// * `img` - The image to encode, already resized
/// * `format` - Target container
/// * `settings` - Per-codec options built once for the request
///
/// # Returns
/// * `Ok(bytes)` - The encoded image
/// * `Err(CompressionError)` - A codec-specific error; no fallback is attempted here
pub fn encode_image(
    img: &DynamicImage,
    format: OutputFormat,
    settings: &EncoderSettings,
) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Jpeg if settings.jpeg.progressive => {
            encode_progressive_jpeg(img, settings.jpeg.quality)
        }
        OutputFormat::Jpeg => encode_jpeg(img, settings.jpeg.quality),
        OutputFormat::Png => encode_png(img, settings),
        OutputFormat::WebP => encode_webp(img, settings.webp.quality),
    }
}

/// Baseline JPEG through the `image` encoder.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality).encode_image(&rgb)?;
    Ok(buffer)
}

/// Progressive JPEG through mozjpeg. libjpeg reports fatal errors by
/// unwinding, so the encoder runs under `catch_unwind`.
pub fn encode_progressive_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    let pixels = rgb.into_raw();

    let encoded = panic::catch_unwind(|| -> std::io::Result<Vec<u8>> {
        let mut comp = Compress::new(ColorSpace::JCS_RGB);
        comp.set_size(width, height);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();

        let mut started = comp.start_compress(Vec::new())?;
        started.write_scanlines(&pixels)?;
        started.finish()
    })
    .map_err(|_| CompressionError::JpegEncoding("encoder aborted".to_string()))?;

    encoded.map_err(|e| CompressionError::JpegEncoding(e.to_string()))
}

fn encode_png(img: &DynamicImage, settings: &EncoderSettings) -> Result<Vec<u8>> {
    let compression = if settings.png.compression_level >= PNG_COMPRESSION_LEVEL {
        CompressionType::Best
    } else {
        CompressionType::Default
    };
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buffer, compression, PngFilter::Adaptive);
    encoder.write_image(img.as_bytes(), img.width(), img.height(), img.color().into())?;

    let mut options = Options::from_preset(OXIPNG_PRESET);
    options.strip = StripChunks::Safe;
    options.deflate = match settings.png.effort {
        PngEffort::Zopfli { iterations } => Deflaters::Zopfli {
            iterations: NonZeroU8::new(iterations).unwrap_or(NonZeroU8::MIN),
        },
        PngEffort::Libdeflate { level } => Deflaters::Libdeflater { compression: level },
    };

    optimize_from_memory(&buffer, &options)
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}

/// Lossy WebP at `quality`.
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgba = img.to_rgba8();
    let encoded = webp::Encoder::from_rgba(&rgba, rgba.width(), rgba.height())
        .encode_simple(false, quality as f32)
        .map_err(|e| CompressionError::WebpEncoding(format!("{:?}", e)))?;
    Ok(encoded.to_vec())
}

/// Policy decision + transcode + bookkeeping for one asset. Callers are
/// expected to have validated the request and the asset already.
///
/// # Arguments
/// * `asset` - The uploaded bytes with their declared name and media type
/// * `request` - Quality and requested output format
/// * `settings` - Encoder settings built from `request`, shared across a batch
/// * `config` - Supplies the bounding box for downscaling
/// * `transcoder` - The executor that does the decode/resize/encode work
///
/// # Returns
/// * `Ok(CompressionResult)` - Output bytes plus before/after facts
/// * `Err(CompressionError)` - Whatever the transcoder failed with
pub fn process_image_pipeline(
    asset: &ImageAsset,
    request: &CompressionRequest,
    settings: EncoderSettings,
    config: &CompressorConfig,
    transcoder: &dyn Transcoder,
) -> Result<CompressionResult> {
    let source_format = detect_format(asset.bytes()).unwrap_or_else(|| asset.declared_format().clone());
    let output_format = decide_output_format(&source_format, request.quality, request.format);
    let policy = TranscodePolicy::new(request.quality, output_format)
        .with_bounds(config.max_width, config.max_height)
        .with_settings(settings);

    debug!(
        "{}: {} -> {} at quality {} via {}",
        asset.name(),
        source_format,
        policy.output_format,
        request.quality,
        transcoder.name()
    );

    let output = transcoder.transcode(asset.bytes(), &policy)?;
    let output_media = MediaFormat::from(output.format);

    Ok(CompressionResult {
        original_name: asset.name().to_string(),
        original_size: asset.size_bytes(),
        original_width: output.source_width,
        original_height: output.source_height,
        original_format: source_format,
        output_name: derive_output_name(asset.name(), &output_media),
        output_format: output.format,
        output_bytes: output.bytes,
        output_width: output.width,
        output_height: output.height,
    })
}

/// Single-item mode: validation failures and codec failures both surface
/// as the call's error.
///
/// # Arguments
/// * `asset` - The image to compress
/// * `request` - Quality and requested output format
/// * `config` - Size limit and bounding box
/// * `transcoder` - The executor to run
///
/// # Returns
/// * `Ok(CompressionResult)` - The compressed image and its statistics
/// * `Err(CompressionError)` - A validation error before any work, or a transcode error
pub fn compress_image(
    asset: &ImageAsset,
    request: &CompressionRequest,
    config: &CompressorConfig,
    transcoder: &dyn Transcoder,
) -> Result<CompressionResult> {
    request.validate()?;
    validate_asset(asset, config)?;
    process_image_pipeline(asset, request, request.encoder_settings(), config, transcoder)
}
