// File: src/core/word_set.rs
use crate::core::normalizer::NormalizedWord;
use crate::core::types::MAX_BMP_CODE_POINT;
use crate::error::{BuildError, Result};
use std::collections::BTreeSet;

/// Accumulates accepted words. Exact duplicates collapse silently.
#[derive(Debug, Default)]
pub struct WordSetBuilder {
    words: BTreeSet<String>,
    duplicates: usize,
}

impl WordSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the word was already present.
    pub fn insert(&mut self, word: NormalizedWord) -> bool {
        let fresh = self.words.insert(word.into_string());
        if !fresh {
            self.duplicates += 1;
        }
        fresh
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Freezes the set in ascending code-point order.
    ///
    /// `String`'s `Ord` compares UTF-8 bytes, which orders identically to code
    /// points. Fails on the first word holding a character outside the BMP.
    pub fn finish(self) -> Result<WordSet> {
        for word in &self.words {
            if let Some(c) = word.chars().find(|&c| c as u32 > MAX_BMP_CODE_POINT) {
                return Err(BuildError::EncodingUnsupported {
                    word: word.clone(),
                    code_point: c as u32,
                });
            }
        }
        Ok(WordSet { words: self.words.into_iter().collect() })
    }
}

/// Deduplicated, sorted and immutable word list shared by both encoders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSet {
    words: Vec<String>,
}

impl WordSet {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.binary_search_by(|w| w.as_str().cmp(word)).is_ok()
    }

    /// Plain-text list: one word per line, each line newline-terminated.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.words.iter().map(|w| w.len() + 1).sum());
        for word in &self.words {
            out.push_str(word);
            out.push('\n');
        }
        out
    }
}

impl FromIterator<NormalizedWord> for WordSetBuilder {
    fn from_iter<I: IntoIterator<Item = NormalizedWord>>(iter: I) -> Self {
        let mut builder = WordSetBuilder::new();
        for word in iter {
            builder.insert(word);
        }
        builder
    }
}
