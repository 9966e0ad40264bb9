pub const DEFAULT_QUALITY: u8 = 70;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// PNG sources below this quality are re-encoded as JPEG under `auto`.
pub const PNG_TO_JPEG_QUALITY_THRESHOLD: u8 = 80;

pub const DEFAULT_MAX_WIDTH: u32 = 2048;
pub const DEFAULT_MAX_HEIGHT: u32 = 2048;

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const MAX_BATCH_FILES: usize = 20;

pub const PNG_COMPRESSION_LEVEL: u8 = 9;
pub const OXIPNG_PRESET: u8 = 4;
pub const ZOPFLI_QUALITY_THRESHOLD: u8 = 90;
pub const HIGH_EFFORT_QUALITY_THRESHOLD: u8 = 70;
pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;

/// Pause between sequential saves in the client path.
pub const DOWNLOAD_DELAY_MS: u64 = 100;

pub const COMPRESSED_SUFFIX: &str = "_compressed";
pub const DOWNLOAD_PREFIX: &str = "compressed_";

pub const SUPPORTED_INPUT_FORMATS: &[&str] = &["jpeg", "jpg", "png", "webp", "gif", "bmp", "tiff"];
/// Extra spellings accepted on input files but not advertised.
pub const INPUT_EXTENSION_ALIASES: &[&str] = &["tif"];
pub const SUPPORTED_OUTPUT_FORMATS: &[&str] = &["jpeg", "png", "webp"];

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Compressed size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Compression ratio:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
pub const INFO_PREFIX: &str = "📋";

pub const ENV_MAX_FILES: &str = "IMG_SHRINK_MAX_FILES";
pub const ENV_MAX_FILE_SIZE: &str = "IMG_SHRINK_MAX_FILE_SIZE";
pub const ENV_MAX_WIDTH: &str = "IMG_SHRINK_MAX_WIDTH";
pub const ENV_MAX_HEIGHT: &str = "IMG_SHRINK_MAX_HEIGHT";
pub const ENV_DEFAULT_QUALITY: &str = "IMG_SHRINK_DEFAULT_QUALITY";
