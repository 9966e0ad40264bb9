//! Image format utilities and type-safe format handling
//!
//! `MediaFormat` names what a caller declared or what a decoder detected and
//! keeps unknown names around instead of rejecting them.
//! `OutputFormat` is the subset the encoders can write.
use crate::error::{CompressionError, Result};
use image::ImageFormat;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A declared or detected image format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Bmp,
    Tiff,
    /// Any other name, lowercased and kept verbatim.
    Other(String),
}

impl MediaFormat {
    /// Parses a format name such as `"jpg"`, `"PNG"` or `"tiff"`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "jpg" | "jpeg" => MediaFormat::Jpeg,
            "png" => MediaFormat::Png,
            "webp" => MediaFormat::WebP,
            "gif" => MediaFormat::Gif,
            "bmp" => MediaFormat::Bmp,
            "tif" | "tiff" => MediaFormat::Tiff,
            other => MediaFormat::Other(other.to_string()),
        }
    }

    /// Parses an `image/*` MIME type. Returns `None` for non-image media.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let subtype = mime.trim().to_lowercase().strip_prefix("image/")?.to_string();
        let subtype = subtype.split(';').next().unwrap_or_default().trim().to_string();
        if subtype.is_empty() {
            return None;
        }
        Some(MediaFormat::from_name(&subtype))
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(MediaFormat::from_name)
    }

    pub fn from_image_format(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => MediaFormat::Jpeg,
            ImageFormat::Png => MediaFormat::Png,
            ImageFormat::WebP => MediaFormat::WebP,
            ImageFormat::Gif => MediaFormat::Gif,
            ImageFormat::Bmp => MediaFormat::Bmp,
            ImageFormat::Tiff => MediaFormat::Tiff,
            other => MediaFormat::Other(format!("{:?}", other).to_lowercase()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MediaFormat::Jpeg => "jpeg",
            MediaFormat::Png => "png",
            MediaFormat::WebP => "webp",
            MediaFormat::Gif => "gif",
            MediaFormat::Bmp => "bmp",
            MediaFormat::Tiff => "tiff",
            MediaFormat::Other(name) => name,
        }
    }

    /// File extension without the dot; JPEG is written as `jpg`.
    pub fn extension(&self) -> &str {
        match self {
            MediaFormat::Jpeg => "jpg",
            other => other.name(),
        }
    }

    pub fn mime_type(&self) -> String {
        format!("image/{}", self.name())
    }

    /// The encodable counterpart, if the encoders can write this format.
    pub fn as_output(&self) -> Option<OutputFormat> {
        match self {
            MediaFormat::Jpeg => Some(OutputFormat::Jpeg),
            MediaFormat::Png => Some(OutputFormat::Png),
            MediaFormat::WebP => Some(OutputFormat::WebP),
            _ => None,
        }
    }

    /// Whether this is one of the declared input formats the service accepts.
    pub fn is_known(&self) -> bool {
        !matches!(self, MediaFormat::Other(_))
    }
}

impl From<OutputFormat> for MediaFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Jpeg => MediaFormat::Jpeg,
            OutputFormat::Png => MediaFormat::Png,
            OutputFormat::WebP => MediaFormat::WebP,
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for MediaFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Supported output image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JPEG format with lossy compression
    Jpeg,
    /// PNG format with lossless compression
    Png,
    /// WebP format with modern compression
    WebP,
}

impl OutputFormat {
    /// Returns the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    /// Lowercase wire name
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    pub fn all_formats() -> Vec<OutputFormat> {
        vec![OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(CompressionError::UnknownFormat(s.to_string())),
        }
    }
}

/// What the caller asked for: a concrete format, or `auto` to let the
/// policy decide from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestedFormat {
    #[default]
    Auto,
    Exact(OutputFormat),
}

impl FromStr for RequestedFormat {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(RequestedFormat::Auto);
        }
        OutputFormat::from_str(s.trim()).map(RequestedFormat::Exact)
    }
}

impl fmt::Display for RequestedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestedFormat::Auto => f.write_str("auto"),
            RequestedFormat::Exact(format) => f.write_str(format.name()),
        }
    }
}
