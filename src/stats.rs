//! Size and ratio helpers shared by the reports and the CLI output.

const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
const THRESHOLD: u64 = 1024;

/// Format file size in human-readable format
///
/// The value is printed with at most two decimals and trailing zeros
/// dropped, so `1536` is `"1.5 KB"` and `1048576` is `"1 MB"`. Sizes past the
/// largest unit stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit_index = 0;
    let mut divisor: u64 = 1;
    while unit_index < UNITS.len() - 1 && bytes / divisor >= THRESHOLD {
        divisor *= THRESHOLD;
        unit_index += 1;
    }

    let fixed = format!("{:.2}", bytes as f64 / divisor as f64);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit_index])
}

/// Calculate compression ratio as a percentage
///
/// Positive means reduction, negative means the output grew. Zero when the
/// original size is zero.
pub fn ratio_percent(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

/// `"60.0%"` style rendering of a percentage.
pub fn format_ratio(percent: f64) -> String {
    format!("{:.1}%", percent)
}

pub fn compression_ratio(original_size: u64, compressed_size: u64) -> String {
    format_ratio(ratio_percent(original_size, compressed_size))
}
