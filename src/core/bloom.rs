// File: src/core/bloom.rs
use crate::config::BloomConfig;
use crate::core::hash::{hash_pair, BloomKey};
use crate::core::normalizer::normalize;
use crate::core::types::WORD_LENGTH;
use crate::core::word_set::WordSet;
use crate::error::{BuildError, Result};
use std::f64::consts::LN_2;

/// Largest bit array a filter may ask for (512 MiB on disk).
pub const MAX_SIZE_BITS: u64 = u32::MAX as u64;

/// Optimal bit count `ceil(-n * ln(p) / ln(2)^2)`.
///
/// A pure function of `(n, p)`: the consumer rebuilds the same value from its
/// own configuration instead of reading it from `bloom.bin`.
pub fn optimal_bit_count(expected_elements: u64, false_positive_rate: f64) -> u64 {
    let n = expected_elements as f64;
    (-n * false_positive_rate.ln() / (LN_2 * LN_2)).ceil() as u64
}

/// Sizing derived from a [`BloomConfig`]. `size_bits` is never stored on disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomFilterParams {
    pub expected_elements: u64,
    pub false_positive_rate: f64,
    pub hash_functions: u32,
    pub size_bits: u64,
}

impl BloomFilterParams {
    pub fn from_config(config: &BloomConfig) -> Result<Self> {
        config.validate()?;
        let size_bits = optimal_bit_count(config.expected_elements, config.false_positive_rate);
        if size_bits == 0 {
            return Err(BuildError::InvalidConfig(format!(
                "n={} p={} yields an empty bit array",
                config.expected_elements, config.false_positive_rate
            )));
        }
        if size_bits > MAX_SIZE_BITS {
            return Err(BuildError::InvalidConfig(format!(
                "n={} p={} needs {} bits, limit is {}",
                config.expected_elements, config.false_positive_rate, size_bits, MAX_SIZE_BITS
            )));
        }
        Ok(Self {
            expected_elements: config.expected_elements,
            false_positive_rate: config.false_positive_rate,
            hash_functions: config.hash_functions,
            size_bits,
        })
    }

    pub fn byte_len(&self) -> usize {
        self.size_bits.div_ceil(8) as usize
    }
}

/// Bit positions probed for one word: `(h1 + j * h2) mod m` for `j in 0..k`,
/// evaluated without 64-bit wraparound.
fn probe_positions(h1: u64, h2: u64, k: u32, m: u64) -> impl Iterator<Item = u64> {
    let (h1, h2, m) = (u128::from(h1), u128::from(h2), u128::from(m));
    (0..u128::from(k)).map(move |j| ((h1 + j * h2) % m) as u64)
}

#[inline]
fn bit_is_set(bits: &[u8], pos: u64) -> bool {
    bits[(pos / 8) as usize] & (1 << (pos % 8)) != 0
}

/// Batch builder: owns its bit array until `build` hands it over.
pub struct BloomFilterBuilder {
    params: BloomFilterParams,
    key: BloomKey,
}

impl BloomFilterBuilder {
    /// Sizes the filter and draws a fresh random key.
    pub fn new(config: &BloomConfig) -> Result<Self> {
        Ok(Self::with_key(BloomFilterParams::from_config(config)?, BloomKey::generate()))
    }

    /// Fixed key, for reproducible test fixtures.
    pub fn with_key(params: BloomFilterParams, key: BloomKey) -> Self {
        Self { params, key }
    }

    pub fn params(&self) -> &BloomFilterParams {
        &self.params
    }

    /// Single pass over the set. O(n * k).
    pub fn build(self, words: &WordSet) -> BloomFilterImage {
        let mut bits = vec![0u8; self.params.byte_len()];
        for word in words.iter() {
            let (h1, h2) = hash_pair(&self.key, word.as_bytes());
            for pos in probe_positions(h1, h2, self.params.hash_functions, self.params.size_bits) {
                bits[(pos / 8) as usize] |= 1 << (pos % 8);
            }
        }
        BloomFilterImage { bits, key: self.key, params: self.params }
    }
}

/// The finished filter: `bloom.bin` bytes plus the key written to `key.hex`.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilterImage {
    bits: Vec<u8>,
    key: BloomKey,
    params: BloomFilterParams,
}

impl BloomFilterImage {
    /// Reassembles a shipped filter the way the runtime does: the bit count
    /// comes from configuration and must agree with the file length.
    pub fn from_parts(bits: Vec<u8>, key: BloomKey, config: &BloomConfig) -> Result<Self> {
        let params = BloomFilterParams::from_config(config)?;
        if bits.len() != params.byte_len() {
            return Err(BuildError::MalformedArtifact(format!(
                "bloom image has {} bytes, configuration implies {}",
                bits.len(),
                params.byte_len()
            )));
        }
        Ok(Self { bits, key, params })
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn key(&self) -> &BloomKey {
        &self.key
    }

    pub fn params(&self) -> &BloomFilterParams {
        &self.params
    }

    /// Membership test for an already normalized word.
    pub fn contains_normalized(&self, word: &str) -> bool {
        let (h1, h2) = hash_pair(&self.key, word.as_bytes());
        probe_positions(h1, h2, self.params.hash_functions, self.params.size_bits)
            .all(|pos| bit_is_set(&self.bits, pos))
    }

    /// Runtime-style check: normalize, require five letters, then probe.
    pub fn might_contain(&self, raw: &str) -> bool {
        let word = normalize(raw);
        word.chars().count() == WORD_LENGTH && self.contains_normalized(&word)
    }

    /// Share of set bits; about 0.5 at the design load.
    pub fn fill_ratio(&self) -> f64 {
        let set: u64 = self.bits.iter().map(|b| u64::from(b.count_ones())).sum();
        set as f64 / self.params.size_bits as f64
    }
}
