// File: src/config.rs
use crate::error::{BuildError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Bloom filter tuning shared by the generator and the on-device consumer.
/// The consumer recomputes the bit count from these values, so they must match
/// whatever the app ships with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub expected_elements: u64,
    pub false_positive_rate: f64,
    pub hash_functions: u32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            expected_elements: 65_536,
            false_positive_rate: 0.001,
            hash_functions: 10,
        }
    }
}

impl BloomConfig {
    pub fn validate(&self) -> Result<()> {
        if self.expected_elements == 0 {
            return Err(BuildError::InvalidConfig(
                "expected_elements must be greater than zero".into(),
            ));
        }
        let p = self.false_positive_rate;
        if !(p > 0.0 && p < 1.0) {
            return Err(BuildError::InvalidConfig(format!(
                "false_positive_rate must lie strictly between 0 and 1, got {p}"
            )));
        }
        if self.hash_functions == 0 {
            return Err(BuildError::InvalidConfig(
                "hash_functions must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// File names of the produced artifacts inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLayout {
    pub word_list: String,
    pub bloom: String,
    pub key: String,
    pub lexicon: String,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            word_list: "words_for_bloom.txt".to_string(),
            bloom: "bloom.bin".to_string(),
            key: "key.hex".to_string(),
            lexicon: "words_5_be.bin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub bloom: BloomConfig,
    pub outputs: OutputLayout,
}

impl BuildConfig {
    /// Reads a JSON config file. Absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BuildError::InputNotFound { path: path.to_path_buf() },
            _ => BuildError::io(path, e),
        })?;
        let config: BuildConfig =
            serde_json::from_str(&text).map_err(|e| BuildError::MalformedInput {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.bloom.validate()?;
        Ok(config)
    }
}
