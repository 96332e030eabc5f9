// File: src/core/lexicon.rs
//! Exact lexicon binary.
//!
//! ```text
//! offset 0      u32 BE   record count N
//! offset 4      N x 10   five UTF-16BE code units per word, no BOM
//! ```
//!
//! Records follow the word set's code-point order, and for BMP text that is
//! also byte order, so the consumer can binary-search raw record bytes.

use crate::core::normalizer::normalize;
use crate::core::types::{MAX_BMP_CODE_POINT, WORD_LENGTH};
use crate::core::word_set::WordSet;
use crate::error::{BuildError, Result};
use std::cmp::Ordering;

pub const HEADER_LEN: usize = 4;
pub const RECORD_LEN: usize = WORD_LENGTH * 2;

/// Encodes one word into its fixed 10-byte record.
pub fn encode_record(word: &str) -> Result<[u8; RECORD_LEN]> {
    let mut record = [0u8; RECORD_LEN];
    let mut len = 0;
    for c in word.chars() {
        let code = c as u32;
        if code > MAX_BMP_CODE_POINT {
            return Err(BuildError::EncodingUnsupported { word: word.to_string(), code_point: code });
        }
        if len == WORD_LENGTH {
            len += 1;
            break;
        }
        record[len * 2..len * 2 + 2].copy_from_slice(&(code as u16).to_be_bytes());
        len += 1;
    }
    if len != WORD_LENGTH {
        return Err(BuildError::SizeInvariantViolation(format!(
            "word {word:?} does not have exactly {WORD_LENGTH} letters"
        )));
    }
    Ok(record)
}

pub struct LexiconEncoder;

impl LexiconEncoder {
    /// Serializes the set into a complete image. Nothing is returned unless
    /// every record encoded, so a failure can never leave a partial file.
    pub fn encode(words: &WordSet) -> Result<LexiconImage> {
        let count = u32::try_from(words.len()).map_err(|_| {
            BuildError::SizeInvariantViolation(format!("{} words overflow the u32 header", words.len()))
        })?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + words.len() * RECORD_LEN);
        bytes.extend_from_slice(&count.to_be_bytes());
        for word in words.iter() {
            bytes.extend_from_slice(&encode_record(word)?);
        }
        LexiconImage::from_bytes(bytes)
    }
}

/// Validated lexicon bytes, as written to disk or loaded back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconImage {
    bytes: Vec<u8>,
    count: usize,
}

impl LexiconImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(BuildError::MalformedArtifact(format!(
                "lexicon has {} bytes, shorter than its header",
                bytes.len()
            )));
        }
        let count = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let expected = HEADER_LEN + count * RECORD_LEN;
        if bytes.len() != expected {
            return Err(BuildError::MalformedArtifact(format!(
                "lexicon header declares {count} records ({expected} bytes) but file has {} bytes",
                bytes.len()
            )));
        }
        Ok(Self { bytes, count })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn record(&self, index: usize) -> &[u8] {
        let start = HEADER_LEN + index * RECORD_LEN;
        &self.bytes[start..start + RECORD_LEN]
    }

    /// Decodes every record back to text, in file order.
    pub fn words(&self) -> Result<Vec<String>> {
        (0..self.count)
            .map(|i| {
                let units: Vec<u16> = self
                    .record(i)
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|_| {
                    BuildError::MalformedArtifact(format!("record {i} is not valid UTF-16"))
                })
            })
            .collect()
    }

    /// Exact lookup of an already normalized word. O(log n) record compares.
    pub fn contains_normalized(&self, word: &str) -> bool {
        let Ok(key) = encode_record(word) else {
            return false;
        };
        let (mut low, mut high) = (0usize, self.count);
        while low < high {
            let mid = low + (high - low) / 2;
            match self.record(mid).cmp(&key[..]) {
                Ordering::Less => low = mid + 1,
                Ordering::Greater => high = mid,
                Ordering::Equal => return true,
            }
        }
        false
    }

    /// Runtime-style check: normalize first, then search.
    pub fn contains(&self, raw: &str) -> bool {
        self.contains_normalized(&normalize(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout_is_utf16_be() {
        let record = encode_record("abcde").unwrap();
        assert_eq!(record, [0, b'a', 0, b'b', 0, b'c', 0, b'd', 0, b'e']);
        let record = encode_record("داشتن").unwrap();
        assert_eq!(&record[..2], &[0x06, 0x2F]);
    }

    #[test]
    fn record_rejects_wrong_length() {
        assert!(matches!(encode_record("abcd"), Err(BuildError::SizeInvariantViolation(_))));
        assert!(matches!(encode_record("abcdef"), Err(BuildError::SizeInvariantViolation(_))));
    }

    #[test]
    fn truncated_image_is_rejected() {
        assert!(LexiconImage::from_bytes(vec![0, 0]).is_err());
        assert!(LexiconImage::from_bytes(vec![0, 0, 0, 1, 0, b'a']).is_err());
        assert!(LexiconImage::from_bytes(vec![0, 0, 0, 0]).unwrap().is_empty());
    }
}
