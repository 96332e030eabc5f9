// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Every game word is exactly this many code points after normalization.
pub const WORD_LENGTH: usize = 5;

/// Highest code point a fixed-width 16-bit record can carry.
pub const MAX_BMP_CODE_POINT: u32 = 0xFFFF;

/// One raw entry of a word pack, as it appears in the rich JSON input.
/// Only `word` feeds the artifacts; the tags are tallied for the build report
/// and then dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub pack: Option<String>,
}

impl WordEntry {
    pub fn bare(word: impl Into<String>) -> Self {
        Self { word: word.into(), ..Self::default() }
    }
}
