// File: src/pipeline.rs
use crate::config::{BuildConfig, OutputLayout};
use crate::core::bloom::{BloomFilterBuilder, BloomFilterImage};
use crate::core::lexicon::{LexiconEncoder, LexiconImage, HEADER_LEN, RECORD_LEN};
use crate::core::word_set::WordSet;
use crate::error::{BuildError, Result};
use crate::loader::{load_words, InputFormat, LoadReport};
use crate::persistence::{write_all_atomic, write_atomic};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Below this share of the configured capacity the filter is mostly empty.
const UNDERFILL_RATIO: f64 = 0.5;

/// Everything a run produces, held in memory until validated.
pub struct BuildArtifacts {
    pub words: WordSet,
    pub bloom: BloomFilterImage,
    pub lexicon: LexiconImage,
    pub report: LoadReport,
}

impl BuildArtifacts {
    /// Cross-checks both images against the word set. A failure here is a bug
    /// in this crate, not bad input.
    pub fn validate(&self) -> Result<()> {
        if self.lexicon.len() != self.words.len() {
            return Err(BuildError::SizeInvariantViolation(format!(
                "lexicon holds {} records for {} words",
                self.lexicon.len(),
                self.words.len()
            )));
        }
        let expected_bytes = HEADER_LEN + self.words.len() * RECORD_LEN;
        if self.lexicon.as_bytes().len() != expected_bytes {
            return Err(BuildError::SizeInvariantViolation(format!(
                "lexicon is {} bytes, expected {}",
                self.lexicon.as_bytes().len(),
                expected_bytes
            )));
        }
        if self.bloom.bits().len() != self.bloom.params().byte_len() {
            return Err(BuildError::SizeInvariantViolation(format!(
                "bloom image is {} bytes, expected {}",
                self.bloom.bits().len(),
                self.bloom.params().byte_len()
            )));
        }
        if let Some(missing) = self.words.iter().find(|w| !self.bloom.contains_normalized(w)) {
            return Err(BuildError::SizeInvariantViolation(format!(
                "bloom filter misses inserted word {missing:?}"
            )));
        }
        Ok(())
    }

    /// Validates, then writes all artifacts as one group: either every file is
    /// replaced or none is. Returns the paths written, word list first when
    /// requested.
    pub fn write_to(&self, dir: &Path, layout: &OutputLayout, with_word_list: bool) -> Result<Vec<PathBuf>> {
        self.validate()?;
        let mut outputs: Vec<(PathBuf, &[u8])> = Vec::with_capacity(4);
        let text = self.words.to_text();
        if with_word_list {
            outputs.push((dir.join(&layout.word_list), text.as_bytes()));
        }
        let key_hex = self.bloom.key().to_hex();
        outputs.push((dir.join(&layout.bloom), self.bloom.bits()));
        outputs.push((dir.join(&layout.key), key_hex.as_bytes()));
        outputs.push((dir.join(&layout.lexicon), self.lexicon.as_bytes()));

        let files: Vec<(&Path, &[u8])> = outputs.iter().map(|(path, bytes)| (path.as_path(), *bytes)).collect();
        write_all_atomic(&files)?;
        for (path, bytes) in &outputs {
            info!("wrote {} ({:.1} KB)", path.display(), bytes.len() as f64 / 1024.0);
        }
        Ok(outputs.into_iter().map(|(path, _)| path).collect())
    }
}

/// Drives one run: words in, both images out.
pub struct Pipeline<'a> {
    config: &'a BuildConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a BuildConfig) -> Self {
        Self { config }
    }

    pub fn build_from_path(&self, input: &Path, format: Option<InputFormat>) -> Result<BuildArtifacts> {
        let (words, report) = load_words(input, format)?;
        self.build(words, report)
    }

    /// Builds with a freshly generated key.
    pub fn build(&self, words: WordSet, report: LoadReport) -> Result<BuildArtifacts> {
        let builder = BloomFilterBuilder::new(&self.config.bloom)?;
        self.build_with(builder, words, report)
    }

    pub fn build_with(
        &self,
        builder: BloomFilterBuilder,
        words: WordSet,
        report: LoadReport,
    ) -> Result<BuildArtifacts> {
        let params = *builder.params();
        info!(
            "bloom: n={} p={} k={} -> {} bits ({:.1} KB)",
            params.expected_elements,
            params.false_positive_rate,
            params.hash_functions,
            params.size_bits,
            params.byte_len() as f64 / 1024.0
        );
        let word_count = words.len() as u64;
        if word_count > params.expected_elements {
            warn!(
                "{} words exceed the configured {} expected elements; false-positive rate will be above {}",
                word_count, params.expected_elements, params.false_positive_rate
            );
        } else if (word_count as f64) < params.expected_elements as f64 * UNDERFILL_RATIO {
            warn!(
                "{} words fill less than half of the configured {} expected elements; filter is oversized",
                word_count, params.expected_elements
            );
        }

        let bloom = builder.build(&words);
        info!("bloom fill ratio {:.3}", bloom.fill_ratio());
        let lexicon = LexiconEncoder::encode(&words)?;

        let artifacts = BuildArtifacts { words, bloom, lexicon, report };
        artifacts.validate()?;
        Ok(artifacts)
    }

    /// Standalone lexicon run: no bloom filter, no key.
    pub fn lexicon_from_path(&self, input: &Path, format: Option<InputFormat>, output: &Path) -> Result<LexiconImage> {
        let (words, _) = load_words(input, format)?;
        let lexicon = LexiconEncoder::encode(&words)?;
        if lexicon.len() != words.len() {
            return Err(BuildError::SizeInvariantViolation(format!(
                "lexicon holds {} records for {} words",
                lexicon.len(),
                words.len()
            )));
        }
        write_atomic(output, lexicon.as_bytes())?;
        info!("wrote {} words to {}", lexicon.len(), output.display());
        Ok(lexicon)
    }
}
