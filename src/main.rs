use anyhow::{Context, Result};
use clap::Parser;
use img_shrink::cli::{Args, Commands};
use img_shrink::client::{download_name, ClientSession, RasterTranscoder};
use img_shrink::constants::{ERROR_PREFIX, PROGRESS_BAR_TEMPLATE, SUCCESS_PREFIX};
use img_shrink::error::CompressionError;
use img_shrink::files::{collect_image_files, load_asset, write_output};
use img_shrink::info::{print_formats, print_image_info, supported_formats, ImageInfo};
use img_shrink::logger::init_logging;
use img_shrink::models::{BatchReport, CompressionRequest, ImageAsset};
use img_shrink::processing::ImageTranscoder;
use img_shrink::report::{print_batch, print_result, BatchResponse, CompressionReport};
use img_shrink::{compress_batch_async, compress_batch_with_progress, compress_image, CompressorConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet, args.verbose);
    let config = CompressorConfig::from_env();

    match args.command {
        Commands::Compress {
            input,
            output,
            quality,
            format,
            width,
            height,
            json,
            embed,
        } => {
            let config = config.with_bounds(width, height);
            let request = CompressionRequest::parse(
                Some(quality.unwrap_or(config.default_quality)),
                format.as_deref(),
            )?;
            let asset = load_asset(&input, &config)?;
            let result = compress_image(&asset, &request, &config, &ImageTranscoder)
                .with_context(|| format!("Failed to compress {}", input.display()))?;
            let path = write_output(&output, &result.output_name, &result.output_bytes)?;

            if json {
                print_json(&CompressionReport::from_result(&result, embed))?;
            } else {
                print_result(&result);
                println!("{} Saved to {}", SUCCESS_PREFIX, path.display());
            }
        }
        Commands::Batch {
            input,
            output,
            quality,
            format,
            width,
            height,
            threads,
            recursive,
            use_async,
            json,
            embed,
        } => {
            setup_thread_pool(threads);
            let config = config.with_bounds(width, height);
            let request = CompressionRequest::parse(
                Some(quality.unwrap_or(config.default_quality)),
                format.as_deref(),
            )?;
            let assets = load_batch(&input, recursive, &config)?;

            let report = if use_async {
                let runtime = tokio::runtime::Runtime::new()?;
                runtime.block_on(compress_batch_async(
                    assets,
                    request,
                    config,
                    Arc::new(ImageTranscoder),
                ))?
            } else {
                let progress = progress_bar(assets.len(), json || args.quiet)?;
                let report = compress_batch_with_progress(
                    &assets,
                    &request,
                    &config,
                    &ImageTranscoder,
                    |_| progress.inc(1),
                )?;
                progress.finish_and_clear();
                report
            };

            save_batch(&report, &output)?;

            if json {
                print_json(&BatchResponse::from_report(&report, embed))?;
            } else {
                print_batch(&report);
                println!("{} Output written to {}", SUCCESS_PREFIX, output.display());
            }
        }
        Commands::Local {
            inputs,
            output,
            quality,
            delay_ms,
        } => {
            let assets = inputs
                .iter()
                .map(|path| load_asset(path, &config))
                .collect::<img_shrink::Result<Vec<ImageAsset>>>()?;

            let mut session = ClientSession::new(config);
            session.set_quality(quality.unwrap_or(config.default_quality))?;
            session.select_files(assets)?;
            session.compress_all(&RasterTranscoder)?;
            session.save_all(&output, Duration::from_millis(delay_ms))?;

            for result in session.results() {
                print_result(result);
                println!("  💾 {}", download_name(result));
            }
            for failure in session.failures() {
                println!("{} {}: {}", ERROR_PREFIX, failure.original_name, failure.error);
            }
        }
        Commands::Info { input, json } => {
            let info = ImageInfo::from_path(&input)?;
            if json {
                print_json(&info)?;
            } else {
                print_image_info(&info);
            }
        }
        Commands::Formats { json } => {
            let formats = supported_formats(&config);
            if json {
                print_json(&formats)?;
            } else {
                print_formats(&formats);
            }
        }
    }

    Ok(())
}

fn setup_thread_pool(threads: Option<usize>) {
    if let Some(num_threads) = threads {
        if let Err(e) = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!("Failed to set thread pool size: {}", e);
        }
    }
}

fn load_batch(input: &str, recursive: bool, config: &CompressorConfig) -> Result<Vec<ImageAsset>> {
    let files = collect_image_files(input, recursive)?;
    if files.is_empty() {
        return Err(CompressionError::NoImageFilesFound(input.to_string()).into());
    }
    // Reject oversized batches before reading any file.
    if files.len() > config.max_files {
        return Err(CompressionError::BatchFileLimitExceeded(files.len(), config.max_files).into());
    }

    info!("Found {} image file(s) in {}", files.len(), input);
    let assets = files
        .iter()
        .map(|path| load_asset(path, config))
        .collect::<img_shrink::Result<Vec<_>>>()?;
    Ok(assets)
}

fn save_batch(report: &BatchReport, output: &Path) -> Result<()> {
    for result in report.successes() {
        write_output(output, &result.output_name, &result.output_bytes)
            .with_context(|| format!("Failed to write {}", result.output_name))?;
    }
    Ok(())
}

fn progress_bar(len: usize, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let progress = ProgressBar::new(len as u64);
    progress.set_style(ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE)?);
    Ok(progress)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
