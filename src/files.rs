//! Filesystem glue for the CLI: finding inputs, loading them as assets and
//! writing results.
use crate::config::CompressorConfig;
use crate::constants::{INPUT_EXTENSION_ALIASES, SUPPORTED_INPUT_FORMATS};
use crate::error::{CompressionError, Result};
use crate::models::ImageAsset;
use crate::validation::validate_input_path;
use glob::glob;
use image::ImageReader;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Expands `input` into image paths. `input` may be a file, a directory or a
/// glob pattern. Results are sorted so batch indices are stable.
pub fn collect_image_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let input_path = Path::new(input);
    let mut image_files = Vec::new();

    if input_path.is_file() {
        image_files.push(input_path.to_path_buf());
    } else if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path)
        } else {
            WalkDir::new(input_path).max_depth(1)
        };

        for entry in walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && is_image_file(path) {
                image_files.push(path.to_path_buf());
            }
        }
    } else {
        let pattern =
            glob(input).map_err(|_| CompressionError::NoImageFilesFound(input.to_string()))?;
        image_files.extend(
            pattern
                .flatten()
                .filter(|entry| entry.is_file() && is_image_file(entry)),
        );
    }

    image_files.sort();
    debug!("Collected {} image file(s) from {}", image_files.len(), input);
    Ok(image_files)
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_INPUT_FORMATS.contains(&ext.as_str())
                || INPUT_EXTENSION_ALIASES.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reads a file into an asset. Dimensions are filled in when the header can
/// be read; an unreadable header is left for the executor to report.
pub fn load_asset(path: &Path, config: &CompressorConfig) -> Result<ImageAsset> {
    validate_input_path(path, config)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CompressionError::NotAnImage(path.display().to_string()))?;
    let bytes = fs::read(path)?;
    let asset = ImageAsset::from_named_bytes(name, bytes);

    let dimensions = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .ok()
        .and_then(|reader| reader.into_dimensions().ok());

    Ok(match dimensions {
        Some((width, height)) => asset.with_dimensions(width, height),
        None => asset,
    })
}

/// Writes `bytes` as `dir/name`, creating `dir` if needed.
pub fn write_output(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, bytes)?;
    debug!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(path)
}
