use crate::constants::{
    COMPRESSED_SUFFIX, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, HIGH_EFFORT_QUALITY_THRESHOLD,
    LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, PNG_COMPRESSION_LEVEL,
    PNG_TO_JPEG_QUALITY_THRESHOLD, ZOPFLI_ITERATIONS, ZOPFLI_QUALITY_THRESHOLD,
};
use crate::formats::{MediaFormat, RequestedFormat};
use std::path::Path;

/// Picks the format an image is re-encoded to.
///
/// An explicit request always wins. Under `auto`, a PNG source at a quality
/// below 80 is switched to JPEG; everything else keeps its source format,
/// including formats no encoder can write (the executor falls back later).
pub fn decide_output_format(
    input: &MediaFormat,
    quality: u8,
    requested: RequestedFormat,
) -> MediaFormat {
    match requested {
        RequestedFormat::Exact(format) => format.into(),
        RequestedFormat::Auto if *input == MediaFormat::Png && quality < PNG_TO_JPEG_QUALITY_THRESHOLD => {
            MediaFormat::Jpeg
        }
        RequestedFormat::Auto => input.clone(),
    }
}

/// `holiday.png` + JPEG -> `holiday_compressed.jpg`
pub fn derive_output_name(original_name: &str, output: &MediaFormat) -> String {
    let stem = Path::new(original_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}.{}", stem, COMPRESSED_SUFFIX, output.extension())
}

/// Contain-only-downscale: returns the input unchanged when it already fits,
/// otherwise scales uniformly so both sides fit, rounding to the nearest pixel.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let ratio = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let scaled = |side: u32| ((side as f64 * ratio).round() as u32).max(1);
    (scaled(width), scaled(height))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegSettings {
    pub quality: u8,
    /// Write progressive scans instead of a single baseline scan.
    pub progressive: bool,
}

/// Deflate back-end used by the PNG optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngEffort {
    Zopfli { iterations: u8 },
    Libdeflate { level: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngSettings {
    pub quality: u8,
    pub compression_level: u8,
    pub effort: PngEffort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebpSettings {
    pub quality: u8,
}

/// Encoder options for every output codec, built once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    pub jpeg: JpegSettings,
    pub png: PngSettings,
    pub webp: WebpSettings,
}

impl EncoderSettings {
    pub fn for_quality(quality: u8) -> Self {
        // PNG "quality" only steers optimizer effort; see DESIGN.md.
        let effort = if quality >= ZOPFLI_QUALITY_THRESHOLD {
            PngEffort::Zopfli {
                iterations: ZOPFLI_ITERATIONS,
            }
        } else if quality >= HIGH_EFFORT_QUALITY_THRESHOLD {
            PngEffort::Libdeflate {
                level: LIBDEFLATER_HIGH_LEVEL,
            }
        } else {
            PngEffort::Libdeflate {
                level: LIBDEFLATER_LOW_LEVEL,
            }
        };

        Self {
            jpeg: JpegSettings {
                quality,
                progressive: true,
            },
            png: PngSettings {
                quality,
                compression_level: PNG_COMPRESSION_LEVEL,
                effort,
            },
            webp: WebpSettings { quality },
        }
    }
}

/// Everything a `Transcoder` needs for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodePolicy {
    pub quality: u8,
    pub output_format: MediaFormat,
    pub max_width: u32,
    pub max_height: u32,
    pub settings: EncoderSettings,
}

impl TranscodePolicy {
    pub fn new(quality: u8, output_format: MediaFormat) -> Self {
        Self {
            quality,
            output_format,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            settings: EncoderSettings::for_quality(quality),
        }
    }

    pub fn with_bounds(mut self, max_width: u32, max_height: u32) -> Self {
        self.max_width = max_width;
        self.max_height = max_height;
        self
    }

    /// Reuses settings already built for the request instead of rebuilding them.
    pub fn with_settings(mut self, settings: EncoderSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::OutputFormat;

    #[test]
    fn test_png_low_quality_switches_to_jpeg() {
        let format = decide_output_format(&MediaFormat::Png, 79, RequestedFormat::Auto);
        assert_eq!(format, MediaFormat::Jpeg);

        let format = decide_output_format(&MediaFormat::Png, 80, RequestedFormat::Auto);
        assert_eq!(format, MediaFormat::Png);
    }

    #[test]
    fn test_auto_keeps_other_formats() {
        for input in [MediaFormat::Jpeg, MediaFormat::WebP, MediaFormat::Gif] {
            assert_eq!(decide_output_format(&input, 10, RequestedFormat::Auto), input);
        }
    }

    #[test]
    fn test_unknown_format_passes_through() {
        let input = MediaFormat::Other("heic".to_string());
        assert_eq!(decide_output_format(&input, 50, RequestedFormat::Auto), input);
    }

    #[test]
    fn test_explicit_request_wins() {
        let requested = RequestedFormat::Exact(OutputFormat::WebP);
        assert_eq!(
            decide_output_format(&MediaFormat::Png, 10, requested),
            MediaFormat::WebP
        );
        let requested = RequestedFormat::Exact(OutputFormat::Png);
        assert_eq!(
            decide_output_format(&MediaFormat::Jpeg, 95, requested),
            MediaFormat::Png
        );
    }

    #[test]
    fn test_derive_output_name() {
        assert_eq!(
            derive_output_name("holiday.png", &MediaFormat::Jpeg),
            "holiday_compressed.jpg"
        );
        assert_eq!(
            derive_output_name("scan.final.tiff", &MediaFormat::WebP),
            "scan.final_compressed.webp"
        );
        assert_eq!(
            derive_output_name("noext", &MediaFormat::Png),
            "noext_compressed.png"
        );
        assert_eq!(
            derive_output_name("anim.gif", &MediaFormat::Gif),
            "anim_compressed.gif"
        );
    }

    #[test]
    fn test_fit_within_keeps_small_images() {
        assert_eq!(fit_within(800, 600, 2048, 2048), (800, 600));
        assert_eq!(fit_within(2048, 2048, 2048, 2048), (2048, 2048));
    }

    #[test]
    fn test_fit_within_scales_down() {
        assert_eq!(fit_within(4000, 2000, 2048, 2048), (2048, 1024));
        assert_eq!(fit_within(1000, 3000, 2048, 2048), (683, 2048));
    }

    #[test]
    fn test_fit_within_never_collapses_to_zero() {
        assert_eq!(fit_within(10_000, 1, 2048, 2048), (2048, 1));
    }

    #[test]
    fn test_encoder_settings_effort() {
        assert!(matches!(
            EncoderSettings::for_quality(95).png.effort,
            PngEffort::Zopfli { .. }
        ));
        assert_eq!(
            EncoderSettings::for_quality(75).png.effort,
            PngEffort::Libdeflate { level: 12 }
        );
        assert_eq!(
            EncoderSettings::for_quality(40).png.effort,
            PngEffort::Libdeflate { level: 8 }
        );
        let settings = EncoderSettings::for_quality(40);
        assert_eq!(settings.jpeg.quality, 40);
        assert!(settings.jpeg.progressive);
        assert_eq!(settings.webp.quality, 40);
        assert_eq!(settings.png.compression_level, 9);
    }

    #[test]
    fn test_policy_defaults() {
        let policy = TranscodePolicy::new(70, MediaFormat::Jpeg);
        assert_eq!((policy.max_width, policy.max_height), (2048, 2048));
        let policy = policy.with_bounds(100, 50);
        assert_eq!((policy.max_width, policy.max_height), (100, 50));
    }
}
