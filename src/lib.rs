pub mod batch;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod files;
pub mod formats;
pub mod info;
pub mod logger;
pub mod models;
pub mod policy;
pub mod processing;
pub mod report;
pub mod stats;
pub mod validation;

pub use batch::{compress_batch, compress_batch_async, compress_batch_with_progress};
pub use client::{ClientSession, RasterTranscoder};
pub use config::CompressorConfig;
pub use error::{CompressionError, ErrorKind, Result};
pub use formats::{MediaFormat, OutputFormat, RequestedFormat};
pub use models::{
    BatchReport, BatchSummary, CompressionRequest, CompressionResult, ImageAsset, ItemFailure,
    ItemOutcome,
};
pub use policy::{decide_output_format, derive_output_name, EncoderSettings, TranscodePolicy};
pub use processing::{compress_image, ImageTranscoder, TranscodeOutput, Transcoder};
pub use stats::{compression_ratio, format_bytes};
