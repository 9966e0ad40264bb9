use crate::constants::{
    DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY, ENV_DEFAULT_QUALITY, ENV_MAX_FILES,
    ENV_MAX_FILE_SIZE, ENV_MAX_HEIGHT, ENV_MAX_WIDTH, MAX_BATCH_FILES, MAX_FILE_SIZE, MAX_QUALITY,
    MIN_QUALITY,
};
use std::env;
use std::str::FromStr;

/// Limits and defaults applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressorConfig {
    pub max_files: usize,
    pub max_file_size: u64,
    pub max_width: u32,
    pub max_height: u32,
    pub default_quality: u8,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            max_files: MAX_BATCH_FILES,
            max_file_size: MAX_FILE_SIZE,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            default_quality: DEFAULT_QUALITY,
        }
    }
}

impl CompressorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads every setting through `lookup`; missing, unparsable or
    /// out-of-range values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_files: parse_or(&lookup, ENV_MAX_FILES, defaults.max_files),
            max_file_size: parse_or(&lookup, ENV_MAX_FILE_SIZE, defaults.max_file_size),
            max_width: parse_valid(&lookup, ENV_MAX_WIDTH, defaults.max_width, |&w| w > 0),
            max_height: parse_valid(&lookup, ENV_MAX_HEIGHT, defaults.max_height, |&h| h > 0),
            default_quality: parse_valid(
                &lookup,
                ENV_DEFAULT_QUALITY,
                defaults.default_quality,
                |q| (MIN_QUALITY..=MAX_QUALITY).contains(q),
            ),
        }
    }

    pub fn with_bounds(mut self, max_width: Option<u32>, max_height: Option<u32>) -> Self {
        if let Some(width) = max_width.filter(|&w| w > 0) {
            self.max_width = width;
        }
        if let Some(height) = max_height.filter(|&h| h > 0) {
            self.max_height = height;
        }
        self
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    parse_valid(lookup, key, default, |_| true)
}

fn parse_valid<F, T, V>(lookup: &F, key: &str, default: T, valid: V) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    V: Fn(&T) -> bool,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .filter(valid)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = CompressorConfig::default();
        assert_eq!(config.max_files, 20);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!((config.max_width, config.max_height), (2048, 2048));
        assert_eq!(config.default_quality, 70);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("IMG_SHRINK_MAX_FILES", "5"),
            ("IMG_SHRINK_MAX_WIDTH", " 1024 "),
            ("IMG_SHRINK_MAX_HEIGHT", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = CompressorConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.max_files, 5);
        assert_eq!(config.max_width, 1024);
        assert_eq!(config.max_height, 2048);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_from_lookup_rejects_out_of_range_values() {
        let vars: HashMap<&str, &str> = [
            ("IMG_SHRINK_MAX_WIDTH", "0"),
            ("IMG_SHRINK_MAX_HEIGHT", "768"),
            ("IMG_SHRINK_DEFAULT_QUALITY", "0"),
        ]
        .into_iter()
        .collect();

        let config = CompressorConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!((config.max_width, config.max_height), (2048, 768));
        assert_eq!(config.default_quality, 70);

        let config = CompressorConfig::from_lookup(|key| {
            (key == "IMG_SHRINK_DEFAULT_QUALITY").then(|| "150".to_string())
        });
        assert_eq!(config.default_quality, 70);

        let config = CompressorConfig::from_lookup(|key| {
            (key == "IMG_SHRINK_DEFAULT_QUALITY").then(|| "45".to_string())
        });
        assert_eq!(config.default_quality, 45);
    }

    #[test]
    fn test_with_bounds_ignores_zero() {
        let config = CompressorConfig::default().with_bounds(Some(0), Some(600));
        assert_eq!((config.max_width, config.max_height), (2048, 600));
    }
}
