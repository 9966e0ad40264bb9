use crate::constants::{DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};
use crate::error::{CompressionError, Result};
use crate::formats::{MediaFormat, OutputFormat, RequestedFormat};
use crate::policy::EncoderSettings;
use crate::stats::{compression_ratio, ratio_percent};
use std::path::Path;
use std::str::FromStr;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// An uploaded image. Immutable once built.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    name: String,
    bytes: Vec<u8>,
    media_type: String,
    declared_format: MediaFormat,
    width: Option<u32>,
    height: Option<u32>,
}

impl ImageAsset {
    /// Builds an asset from an upload, trusting the declared MIME type.
    pub fn from_upload(name: impl Into<String>, bytes: Vec<u8>, media_type: &str) -> Self {
        let name = name.into();
        let declared_format = MediaFormat::from_mime(media_type)
            .or_else(|| MediaFormat::from_extension(Path::new(&name)))
            .unwrap_or_else(|| MediaFormat::Other(String::new()));

        Self {
            name,
            bytes,
            media_type: media_type.trim().to_lowercase(),
            declared_format,
            width: None,
            height: None,
        }
    }

    /// Builds an asset whose media type is inferred from the file name.
    pub fn from_named_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = match MediaFormat::from_extension(Path::new(&name)) {
            Some(format) if format.is_known() => format.mime_type(),
            _ => FALLBACK_MEDIA_TYPE.to_string(),
        };
        Self::from_upload(name, bytes, &media_type)
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn declared_format(&self) -> &MediaFormat {
        &self.declared_format
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Whether the declared media kind is an image at all.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Quality and format chosen by the caller for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionRequest {
    pub quality: u8,
    pub format: RequestedFormat,
}

impl CompressionRequest {
    pub fn new(quality: u8, format: RequestedFormat) -> Result<Self> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(CompressionError::InvalidQuality(quality));
        }
        Ok(Self { quality, format })
    }

    /// Parses optional CLI/form values, applying the defaults.
    pub fn parse(quality: Option<u8>, format: Option<&str>) -> Result<Self> {
        let format = match format {
            Some(name) => RequestedFormat::from_str(name)?,
            None => RequestedFormat::Auto,
        };
        Self::new(quality.unwrap_or(DEFAULT_QUALITY), format)
    }

    pub fn validate(&self) -> Result<()> {
        Self::new(self.quality, self.format).map(|_| ())
    }

    pub fn encoder_settings(&self) -> EncoderSettings {
        EncoderSettings::for_quality(self.quality)
    }
}

impl Default for CompressionRequest {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            format: RequestedFormat::Auto,
        }
    }
}

/// A successfully compressed image together with its before/after facts.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub original_name: String,
    pub original_size: u64,
    pub original_width: u32,
    pub original_height: u32,
    pub original_format: MediaFormat,
    pub output_name: String,
    pub output_format: OutputFormat,
    pub output_bytes: Vec<u8>,
    pub output_width: u32,
    pub output_height: u32,
}

impl CompressionResult {
    pub fn output_size(&self) -> u64 {
        self.output_bytes.len() as u64
    }

    pub fn ratio_percent(&self) -> f64 {
        ratio_percent(self.original_size, self.output_size())
    }

    pub fn compression_ratio(&self) -> String {
        compression_ratio(self.original_size, self.output_size())
    }
}

/// Why a single batch item did not produce output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub index: usize,
    pub original_name: String,
    pub error: String,
}

/// Outcome of one batch slot.
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    Success(CompressionResult),
    Failure(ItemFailure),
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success(_))
    }

    pub fn as_success(&self) -> Option<&CompressionResult> {
        match self {
            ItemOutcome::Success(result) => Some(result),
            ItemOutcome::Failure(_) => None,
        }
    }

    pub fn original_name(&self) -> &str {
        match self {
            ItemOutcome::Success(result) => &result.original_name,
            ItemOutcome::Failure(failure) => &failure.original_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_original_bytes: u64,
    pub total_compressed_bytes: u64,
    pub total_ratio_percent: f64,
}

impl BatchSummary {
    /// Totals over the successful items only.
    pub fn from_outcomes(outcomes: &[ItemOutcome]) -> Self {
        let (total_original_bytes, total_compressed_bytes) = outcomes
            .iter()
            .filter_map(ItemOutcome::as_success)
            .fold((0u64, 0u64), |(before, after), result| {
                (before + result.original_size, after + result.output_size())
            });
        let successful = outcomes.iter().filter(|o| o.is_success()).count();

        Self {
            total: outcomes.len(),
            successful,
            failed: outcomes.len() - successful,
            total_original_bytes,
            total_compressed_bytes,
            total_ratio_percent: ratio_percent(total_original_bytes, total_compressed_bytes),
        }
    }
}

/// Index-preserving batch outcome.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub items: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn from_outcomes(items: Vec<ItemOutcome>) -> Self {
        Self {
            summary: BatchSummary::from_outcomes(&items),
            items,
        }
    }

    pub fn successes(&self) -> impl Iterator<Item = &CompressionResult> {
        self.items.iter().filter_map(ItemOutcome::as_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
        self.items.iter().filter_map(|item| match item {
            ItemOutcome::Failure(failure) => Some(failure),
            ItemOutcome::Success(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(original_size: u64, output_len: usize) -> CompressionResult {
        CompressionResult {
            original_name: "a.png".to_string(),
            original_size,
            original_width: 10,
            original_height: 10,
            original_format: MediaFormat::Png,
            output_name: "a_compressed.jpg".to_string(),
            output_format: OutputFormat::Jpeg,
            output_bytes: vec![0; output_len],
            output_width: 10,
            output_height: 10,
        }
    }

    #[test]
    fn test_request_validation() {
        assert!(CompressionRequest::new(1, RequestedFormat::Auto).is_ok());
        assert!(CompressionRequest::new(100, RequestedFormat::Auto).is_ok());
        assert!(matches!(
            CompressionRequest::new(0, RequestedFormat::Auto),
            Err(CompressionError::InvalidQuality(0))
        ));
        assert!(matches!(
            CompressionRequest::new(101, RequestedFormat::Auto),
            Err(CompressionError::InvalidQuality(101))
        ));
    }

    #[test]
    fn test_request_parse_defaults() {
        let request = CompressionRequest::parse(None, None).unwrap();
        assert_eq!(request, CompressionRequest::default());
        assert_eq!(request.quality, 70);

        let request = CompressionRequest::parse(Some(85), Some("webp")).unwrap();
        assert_eq!(request.format, RequestedFormat::Exact(OutputFormat::WebP));

        assert!(matches!(
            CompressionRequest::parse(None, Some("bmp")),
            Err(CompressionError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_asset_from_upload() {
        let asset = ImageAsset::from_upload("photo.bin", vec![1, 2, 3], "image/PNG");
        assert_eq!(asset.declared_format(), &MediaFormat::Png);
        assert_eq!(asset.size_bytes(), 3);
        assert!(asset.is_image());

        let asset = ImageAsset::from_upload("notes.txt", vec![1], "text/plain");
        assert!(!asset.is_image());
    }

    #[test]
    fn test_asset_from_named_bytes() {
        let asset = ImageAsset::from_named_bytes("cat.JPG", vec![0; 4]);
        assert_eq!(asset.media_type(), "image/jpeg");
        assert_eq!(asset.declared_format(), &MediaFormat::Jpeg);

        let asset = ImageAsset::from_named_bytes("cat.txt", vec![0; 4]);
        assert!(!asset.is_image());
    }

    #[test]
    fn test_summary_counts_successes_only() {
        let outcomes = vec![
            ItemOutcome::Success(result(1000, 400)),
            ItemOutcome::Failure(ItemFailure {
                index: 1,
                original_name: "bad.png".to_string(),
                error: "decode failed".to_string(),
            }),
            ItemOutcome::Success(result(1000, 600)),
        ];

        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_original_bytes, 2000);
        assert_eq!(summary.total_compressed_bytes, 1000);
        assert_eq!(summary.total_ratio_percent, 50.0);
    }

    #[test]
    fn test_summary_all_failed() {
        let outcomes = vec![ItemOutcome::Failure(ItemFailure {
            index: 0,
            original_name: "bad.png".to_string(),
            error: "decode failed".to_string(),
        })];
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total_original_bytes, 0);
        assert_eq!(summary.total_ratio_percent, 0.0);
    }
}
