use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification used to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is unacceptable; nothing was processed.
    Validation,
    /// A codec rejected the input or the requested output.
    Transcode,
    /// Anything else.
    Internal,
}

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("No image files provided")]
    NoFiles,

    #[error("Not an image file: {0}")]
    NotAnImage(String),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Unknown format: {0}. Expected one of auto, jpeg, png, webp")]
    UnknownFormat(String),

    #[error("File too large: {0} is {1} bytes. Maximum allowed: {2} bytes")]
    FileTooLarge(String, u64, u64),

    #[error("Batch file count limit exceeded: {0} files, maximum allowed {1}")]
    BatchFileLimitExceeded(usize, usize),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("No image files found matching: {0}")]
    NoImageFilesFound(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("JPEG encoding error: {0}")]
    JpegEncoding(String),

    #[error("WebP encoding error: {0}")]
    WebpEncoding(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedOutputFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CompressionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompressionError::NoFiles
            | CompressionError::NotAnImage(_)
            | CompressionError::InvalidQuality(_)
            | CompressionError::UnknownFormat(_)
            | CompressionError::FileTooLarge(..)
            | CompressionError::BatchFileLimitExceeded(..)
            | CompressionError::FileNotFound(_)
            | CompressionError::NoImageFilesFound(_) => ErrorKind::Validation,
            CompressionError::ImageProcessing(_)
            | CompressionError::PngOptimization(_)
            | CompressionError::JpegEncoding(_)
            | CompressionError::WebpEncoding(_)
            | CompressionError::UnsupportedOutputFormat(_) => ErrorKind::Transcode,
            CompressionError::Io(_)
            | CompressionError::WalkdirError(_)
            | CompressionError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_transcode(&self) -> bool {
        self.kind() == ErrorKind::Transcode
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
