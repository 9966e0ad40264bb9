//! JSON documents describing compression outcomes, plus the console rendering
//! the CLI prints for humans.
use crate::constants::{
    COMPRESSED_SIZE_PREFIX, COMPRESSION_RATIO_PREFIX, ERROR_PREFIX, ORIGINAL_SIZE_PREFIX,
    SUCCESS_PREFIX, WARNING_PREFIX,
};
use crate::error::CompressionError;
use crate::formats::{MediaFormat, OutputFormat};
use crate::models::{BatchReport, BatchSummary, CompressionResult, ItemFailure, ItemOutcome};
use crate::stats::{format_bytes, format_ratio};
use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalInfo {
    pub name: String,
    pub size: u64,
    pub formatted_size: String,
    pub width: u32,
    pub height: u32,
    pub format: MediaFormat,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedInfo {
    pub name: String,
    pub size: u64,
    pub formatted_size: String,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub compression_ratio: String,
}

/// Single-item document.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionReport {
    pub success: bool,
    pub original: OriginalInfo,
    pub compressed: CompressedInfo,
    /// `data:image/<format>;base64,...`, omitted when the caller wrote the
    /// bytes somewhere else.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CompressionReport {
    pub fn from_result(result: &CompressionResult, embed_image: bool) -> Self {
        Self {
            success: true,
            original: OriginalInfo {
                name: result.original_name.clone(),
                size: result.original_size,
                formatted_size: format_bytes(result.original_size),
                width: result.original_width,
                height: result.original_height,
                format: result.original_format.clone(),
            },
            compressed: CompressedInfo {
                name: result.output_name.clone(),
                size: result.output_size(),
                formatted_size: format_bytes(result.output_size()),
                format: result.output_format,
                width: result.output_width,
                height: result.output_height,
                compression_ratio: result.compression_ratio(),
            },
            image: embed_image.then(|| data_uri(&result.output_bytes, result.output_format)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_original_size: String,
    pub total_compressed_size: String,
    pub total_compression_ratio: String,
}

impl From<&BatchSummary> for SummaryReport {
    fn from(summary: &BatchSummary) -> Self {
        Self {
            total: summary.total,
            successful: summary.successful,
            failed: summary.failed,
            total_original_size: format_bytes(summary.total_original_bytes),
            total_compressed_size: format_bytes(summary.total_compressed_bytes),
            total_compression_ratio: format_ratio(summary.total_ratio_percent),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessItem {
    pub index: usize,
    #[serde(flatten)]
    pub report: CompressionReport,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureItem {
    pub index: usize,
    pub success: bool,
    pub original_name: String,
    pub error: String,
}

impl From<&ItemFailure> for FailureItem {
    fn from(failure: &ItemFailure) -> Self {
        Self {
            index: failure.index,
            success: false,
            original_name: failure.original_name.clone(),
            error: failure.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchItemReport {
    Success(SuccessItem),
    Failure(FailureItem),
}

/// Batch document. `results` keeps input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub summary: SummaryReport,
    pub results: Vec<BatchItemReport>,
}

impl BatchResponse {
    pub fn from_report(report: &BatchReport, embed_images: bool) -> Self {
        let results = report
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                ItemOutcome::Success(result) => BatchItemReport::Success(SuccessItem {
                    index,
                    report: CompressionReport::from_result(result, embed_images),
                }),
                ItemOutcome::Failure(failure) => BatchItemReport::Failure(failure.into()),
            })
            .collect();

        Self {
            success: true,
            summary: SummaryReport::from(&report.summary),
            results,
        }
    }
}

/// Request-level failure document.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub success: bool,
    pub error: String,
}

impl From<&CompressionError> for ErrorReport {
    fn from(err: &CompressionError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
        }
    }
}

pub fn data_uri(bytes: &[u8], format: OutputFormat) -> String {
    format!(
        "data:image/{};base64,{}",
        format.name(),
        general_purpose::STANDARD.encode(bytes)
    )
}

pub fn print_result(result: &CompressionResult) {
    println!(
        "{} {} -> {} ({})",
        SUCCESS_PREFIX, result.original_name, result.output_name, result.output_format
    );
    println!(
        "  {} {} ({}x{})",
        ORIGINAL_SIZE_PREFIX,
        format_bytes(result.original_size),
        result.original_width,
        result.original_height
    );
    println!(
        "  {} {} ({}x{})",
        COMPRESSED_SIZE_PREFIX,
        format_bytes(result.output_size()),
        result.output_width,
        result.output_height
    );
    println!("  {} {}", COMPRESSION_RATIO_PREFIX, result.compression_ratio());
}

pub fn print_batch(report: &BatchReport) {
    for item in &report.items {
        match item {
            ItemOutcome::Success(result) => print_result(result),
            ItemOutcome::Failure(failure) => println!(
                "{} [{}] {}: {}",
                ERROR_PREFIX,
                failure.index + 1,
                failure.original_name,
                failure.error
            ),
        }
    }

    let summary = SummaryReport::from(&report.summary);
    println!("\n📊 Batch Compression Summary:");
    println!(
        "  📁 Files: {} total, {} succeeded, {} failed",
        summary.total, summary.successful, summary.failed
    );
    println!("  {} {}", ORIGINAL_SIZE_PREFIX, summary.total_original_size);
    println!("  {} {}", COMPRESSED_SIZE_PREFIX, summary.total_compressed_size);
    println!("  {} {}", COMPRESSION_RATIO_PREFIX, summary.total_compression_ratio);
    if summary.failed > 0 {
        println!("  {}  Failed files: {}", WARNING_PREFIX, summary.failed);
    }
}
