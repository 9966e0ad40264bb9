use crate::config::CompressorConfig;
use crate::error::{CompressionError, Result};
use crate::models::{CompressionRequest, ImageAsset};
use std::fs;
use std::path::Path;

/// Per-asset checks that run before any decoding.
pub fn validate_asset(asset: &ImageAsset, config: &CompressorConfig) -> Result<()> {
    if !asset.is_image() {
        return Err(CompressionError::NotAnImage(asset.name().to_string()));
    }

    if asset.size_bytes() > config.max_file_size {
        return Err(CompressionError::FileTooLarge(
            asset.name().to_string(),
            asset.size_bytes(),
            config.max_file_size,
        ));
    }

    Ok(())
}

/// Whole-batch pre-checks. Any failure rejects the batch before a single
/// image is touched.
pub fn validate_batch(
    assets: &[ImageAsset],
    request: &CompressionRequest,
    config: &CompressorConfig,
) -> Result<()> {
    if assets.is_empty() {
        return Err(CompressionError::NoFiles);
    }

    if assets.len() > config.max_files {
        return Err(CompressionError::BatchFileLimitExceeded(
            assets.len(),
            config.max_files,
        ));
    }

    request.validate()?;

    assets
        .iter()
        .try_for_each(|asset| validate_asset(asset, config))
}

/// Validate input file path for accessibility and size before reading it.
pub fn validate_input_path(path: &Path, config: &CompressorConfig) -> Result<()> {
    if !path.exists() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(CompressionError::NotAnImage(path.display().to_string()));
    }

    let metadata =
        fs::metadata(path).map_err(|_| CompressionError::FileNotFound(path.to_path_buf()))?;

    if metadata.len() > config.max_file_size {
        return Err(CompressionError::FileTooLarge(
            path.display().to_string(),
            metadata.len(),
            config.max_file_size,
        ));
    }

    Ok(())
}
