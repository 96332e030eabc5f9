// File: src/loader.rs
use crate::core::normalizer::{NormalizationReject, NormalizedWord};
use crate::core::types::WordEntry;
use crate::core::word_set::{WordSet, WordSetBuilder};
use crate::error::{BuildError, Result};
use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const UNKNOWN_TAG: &str = "unknown";
/// How many rejected words are echoed at debug level.
const REJECT_SAMPLES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Rich word-pack JSON: an array of `{"word", "difficulty", "pack"}` objects.
    Json,
    /// UTF-8 text, one word per line.
    Text,
}

impl InputFormat {
    pub fn detect(path: &Path, contents: &str) -> Self {
        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let by_content = matches!(contents.trim_start().chars().next(), Some('[') | Some('{'));
        if by_extension || by_content {
            InputFormat::Json
        } else {
            InputFormat::Text
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryDocument {
    Many(Vec<WordEntry>),
    One(WordEntry),
}

/// Per-run tallies. Rejections land here instead of failing the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub entries: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub difficulty: BTreeMap<String, usize>,
    pub packs: BTreeMap<String, usize>,
}

/// Feeds entries through the normalizer into a [`WordSetBuilder`].
#[derive(Default)]
pub struct WordCollector {
    builder: WordSetBuilder,
    report: LoadReport,
}

impl WordCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: &WordEntry) -> std::result::Result<(), NormalizationReject> {
        self.report.entries += 1;
        match NormalizedWord::parse(&entry.word) {
            Ok(word) => {
                self.report.accepted += 1;
                self.builder.insert(word);
                let difficulty = entry.difficulty.as_deref().unwrap_or(UNKNOWN_TAG);
                *self.report.difficulty.entry(difficulty.to_string()).or_insert(0) += 1;
                let pack = entry.pack.as_deref().unwrap_or(UNKNOWN_TAG);
                *self.report.packs.entry(pack.to_string()).or_insert(0) += 1;
                Ok(())
            }
            Err(reject) => {
                if self.report.rejected < REJECT_SAMPLES {
                    debug!("rejected: {}", reject);
                }
                self.report.rejected += 1;
                Err(reject)
            }
        }
    }

    pub fn add_word(&mut self, raw: &str) -> std::result::Result<(), NormalizationReject> {
        self.add_entry(&WordEntry::bare(raw))
    }

    /// Closes the set; fails if any accepted word cannot be encoded.
    pub fn finish(mut self) -> Result<(WordSet, LoadReport)> {
        self.report.duplicates = self.builder.duplicates();
        let words = self.builder.finish()?;
        info!(
            "{} entries: {} accepted, {} rejected, {} duplicates, {} unique words",
            self.report.entries,
            self.report.accepted,
            self.report.rejected,
            self.report.duplicates,
            words.len()
        );
        Ok((words, self.report))
    }
}

/// Parses rich JSON entries. A lone object is treated as a one-entry list.
pub fn parse_json_entries(path: &Path, contents: &str) -> Result<Vec<WordEntry>> {
    let document: EntryDocument =
        serde_json::from_str(contents).map_err(|e| BuildError::MalformedInput {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(match document {
        EntryDocument::Many(entries) => entries,
        EntryDocument::One(entry) => vec![entry],
    })
}

/// Collects from already loaded text. Blank lines are skipped, not rejected.
pub fn collect_words(path: &Path, contents: &str, format: InputFormat) -> Result<(WordSet, LoadReport)> {
    let mut collector = WordCollector::new();
    match format {
        InputFormat::Json => {
            for entry in parse_json_entries(path, contents)? {
                let _ = collector.add_entry(&entry);
            }
        }
        InputFormat::Text => {
            for line in contents.lines().filter(|l| !l.trim().is_empty()) {
                let _ = collector.add_word(line);
            }
        }
    }
    collector.finish()
}

/// Reads and collects an input file. `format` of `None` means auto-detect.
pub fn load_words(path: &Path, format: Option<InputFormat>) -> Result<(WordSet, LoadReport)> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BuildError::InputNotFound { path: path.to_path_buf() },
        _ => BuildError::io(path, e),
    })?;
    let contents = String::from_utf8(bytes).map_err(|e| BuildError::MalformedInput {
        path: path.to_path_buf(),
        reason: format!("not valid UTF-8: {e}"),
    })?;
    let format = format.unwrap_or_else(|| InputFormat::detect(path, &contents));
    info!("loading {} as {:?}", path.display(), format);
    collect_words(path, &contents, format)
}
