use crate::config::CompressorConfig;
use crate::error::{CompressionError, Result};
use crate::models::{BatchReport, CompressionRequest, ImageAsset, ItemFailure, ItemOutcome};
use crate::policy::EncoderSettings;
use crate::processing::{process_image_pipeline, Transcoder};
use crate::validation::validate_batch;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Compresses every asset and reports per-item outcomes in input order.
///
/// Batch-level problems (no files, too many files, an oversized or non-image
/// member, bad quality) reject the whole call before any image is touched.
/// Per-item codec failures only mark their own slot as failed.
pub fn compress_batch(
    assets: &[ImageAsset],
    request: &CompressionRequest,
    config: &CompressorConfig,
    transcoder: &dyn Transcoder,
) -> Result<BatchReport> {
    compress_batch_with_progress(assets, request, config, transcoder, |_| {})
}

/// Like [`compress_batch`], calling `on_item` with the index of each item as
/// it finishes. Completion order is not input order.
pub fn compress_batch_with_progress<F>(
    assets: &[ImageAsset],
    request: &CompressionRequest,
    config: &CompressorConfig,
    transcoder: &dyn Transcoder,
    on_item: F,
) -> Result<BatchReport>
where
    F: Fn(usize) + Sync,
{
    validate_batch(assets, request, config)?;

    let start_time = Instant::now();
    let settings = request.encoder_settings();

    let items: Vec<ItemOutcome> = assets
        .par_iter()
        .enumerate()
        .map(|(index, asset)| {
            let outcome = compress_item(index, asset, request, settings, config, transcoder);
            on_item(index);
            outcome
        })
        .collect();

    let report = BatchReport::from_outcomes(items);
    log_summary(&report, start_time);
    Ok(report)
}

/// Async driver: each item runs on the blocking pool and results are slotted
/// back by index.
pub async fn compress_batch_async(
    assets: Vec<ImageAsset>,
    request: CompressionRequest,
    config: CompressorConfig,
    transcoder: Arc<dyn Transcoder>,
) -> Result<BatchReport> {
    validate_batch(&assets, &request, &config)?;

    let start_time = Instant::now();
    let settings = request.encoder_settings();
    let names: Vec<String> = assets.iter().map(|a| a.name().to_string()).collect();

    let mut tasks = JoinSet::new();
    for (index, asset) in assets.into_iter().enumerate() {
        let transcoder = Arc::clone(&transcoder);
        tasks.spawn_blocking(move || {
            let outcome = compress_item(index, &asset, &request, settings, &config, &*transcoder);
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<ItemOutcome>> = vec![None; names.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => slots[index] = Some(outcome),
            Err(e) => warn!("Batch task did not complete: {}", e),
        }
    }

    let items = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                let err = CompressionError::Internal("task aborted before completion".to_string());
                ItemOutcome::Failure(ItemFailure {
                    index,
                    original_name: names[index].clone(),
                    error: err.to_string(),
                })
            })
        })
        .collect();

    let report = BatchReport::from_outcomes(items);
    log_summary(&report, start_time);
    Ok(report)
}

fn compress_item(
    index: usize,
    asset: &ImageAsset,
    request: &CompressionRequest,
    settings: EncoderSettings,
    config: &CompressorConfig,
    transcoder: &dyn Transcoder,
) -> ItemOutcome {
    match process_image_pipeline(asset, request, settings, config, transcoder) {
        Ok(result) => ItemOutcome::Success(result),
        Err(e) => {
            warn!("Failed to compress {}: {}", asset.name(), e);
            ItemOutcome::Failure(ItemFailure {
                index,
                original_name: asset.name().to_string(),
                error: e.to_string(),
            })
        }
    }
}

fn log_summary(report: &BatchReport, start_time: Instant) {
    let summary = &report.summary;
    info!(
        "Batch done: {}/{} succeeded, {} -> {} bytes ({:.1}%) in {:?}",
        summary.successful,
        summary.total,
        summary.total_original_bytes,
        summary.total_compressed_bytes,
        summary.total_ratio_percent,
        start_time.elapsed()
    );
}
