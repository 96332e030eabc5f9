// File: src/core/hash.rs
//! Keyed 64-bit hash shared bit-for-bit by the filter generator and the
//! on-device membership check.
//!
//! Deterministic and portable, not cryptographically secure. The layout:
//!
//! 1. fold every byte of `key || message || seed.to_le_bytes()` into a 64-bit
//!    accumulator: `h = (h * FOLD_PRIME) ^ b; h ^= h >> 29; h = h.rotl(7)`;
//! 2. expand the accumulator into 32 bytes, word `i` being
//!    `fmix64(h + i * ROUND_CONSTANT)` stored little-endian;
//! 3. the digest is the first 8 bytes read little-endian.
//!
//! All arithmetic wraps at 64 bits. Changing any constant invalidates every
//! shipped `bloom.bin`/`key.hex` pair.

use crate::error::{BuildError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

pub const KEY_LEN: usize = 16;

const FOLD_INIT: u64 = 0x6a09_e667_f3bc_c908;
const FOLD_PRIME: u64 = 0x0000_0100_0000_01b3;
const ROUND_CONSTANT: u64 = 0x428a_2f98_d728_ae22;
const FMIX_C1: u64 = 0xff51_afd7_ed55_8ccd;
const FMIX_C2: u64 = 0xc4ce_b9fe_1a85_ec53;

const OUTPUT_WORDS: usize = 4;

/// The 16-byte secret that keys the filter. Rendered as 32 uppercase hex
/// characters in `key.hex`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BloomKey([u8; KEY_LEN]);

impl BloomKey {
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh key from the operating system's CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Accepts either hex case and surrounding whitespace (a trailing newline
    /// from an editor is common).
    pub fn from_hex(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.len() != KEY_LEN * 2 {
            return Err(BuildError::MalformedArtifact(format!(
                "key must be {} hex characters, got {}",
                KEY_LEN * 2,
                text.len()
            )));
        }
        let mut bytes = [0u8; KEY_LEN];
        hex::decode_to_slice(text, &mut bytes)
            .map_err(|e| BuildError::MalformedArtifact(format!("invalid key hex: {e}")))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for BloomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BloomKey({})", self.to_hex())
    }
}

#[inline]
fn fold_byte(h: u64, b: u8) -> u64 {
    let mut h = h.wrapping_mul(FOLD_PRIME) ^ u64::from(b);
    h ^= h >> 29;
    h.rotate_left(7)
}

#[inline]
fn fmix64(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(FMIX_C1);
    x ^= x >> 33;
    x = x.wrapping_mul(FMIX_C2);
    x ^= x >> 33;
    x
}

/// Full 32-byte output of the keyed mix.
pub fn digest_block(key: &BloomKey, message: &[u8], seed: u32) -> [u8; OUTPUT_WORDS * 8] {
    let h = key
        .0
        .iter()
        .chain(message)
        .chain(seed.to_le_bytes().iter())
        .fold(FOLD_INIT, |h, &b| fold_byte(h, b));

    let mut out = [0u8; OUTPUT_WORDS * 8];
    for (i, chunk) in out.chunks_exact_mut(8).enumerate() {
        let w = fmix64(h.wrapping_add((i as u64).wrapping_mul(ROUND_CONSTANT)));
        chunk.copy_from_slice(&w.to_le_bytes());
    }
    out
}

pub fn digest64(key: &BloomKey, message: &[u8], seed: u32) -> u64 {
    let block = digest_block(key, message, seed);
    let mut first = [0u8; 8];
    first.copy_from_slice(&block[..8]);
    u64::from_le_bytes(first)
}

/// The two base hashes used for double hashing: seeds 0 and 1.
pub fn hash_pair(key: &BloomKey, message: &[u8]) -> (u64, u64) {
    (digest64(key, message, 0), digest64(key, message, 1))
}
