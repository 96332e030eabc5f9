// File: src/core/normalizer.rs
use crate::core::types::WORD_LENGTH;
use std::fmt;

/// Code points rewritten before comparison. `None` deletes the character.
const SUBSTITUTIONS: &[(char, Option<char>)] = &[
    ('\u{200C}', None),           // zero-width non-joiner
    ('\u{200F}', None),           // right-to-left mark
    ('\u{200E}', None),           // left-to-right mark
    ('\u{064A}', Some('\u{06CC}')), // arabic yeh -> farsi yeh
    ('\u{0643}', Some('\u{06A9}')), // arabic kaf -> keheh
    ('\u{0629}', Some('\u{0647}')), // teh marbuta -> heh
];

/// Combining marks stripped after substitution.
const DIACRITICS: &[char] = &[
    '\u{0670}', // superscript alef
    '\u{064B}', // fathatan
    '\u{064C}', // dammatan
    '\u{064D}', // kasratan
    '\u{064E}', // fatha
    '\u{064F}', // damma
    '\u{0650}', // kasra
    '\u{0651}', // shadda
    '\u{0652}', // sukun
    '\u{0653}', // maddah above
    '\u{0654}', // hamza above
    '\u{0655}', // hamza below
];

fn substitute(c: char) -> Option<char> {
    match SUBSTITUTIONS.iter().find(|(from, _)| *from == c) {
        Some(&(_, to)) => to,
        None => Some(c),
    }
}

/// Canonicalizes a raw word: trim, fold letter forms and drop invisible marks,
/// strip diacritics, lowercase.
///
/// Total and idempotent. Deleting a mark can expose whitespace that sat behind
/// it, so the result is trimmed once more at the end.
pub fn normalize(raw: &str) -> String {
    let folded: String = raw
        .trim()
        .chars()
        .filter_map(substitute)
        .filter(|c| !DIACRITICS.contains(c))
        .collect();
    folded.to_lowercase().trim().to_string()
}

/// A word that survived normalization with exactly [`WORD_LENGTH`] code points.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedWord(String);

/// A word whose normalized form has the wrong length. Dropped and counted,
/// never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationReject {
    pub normalized: String,
    pub length: usize,
}

impl fmt::Display for NormalizationReject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} has {} letters after normalization, expected {}",
            self.normalized, self.length, WORD_LENGTH
        )
    }
}

impl NormalizedWord {
    pub fn parse(raw: &str) -> Result<Self, NormalizationReject> {
        let normalized = normalize(raw);
        let length = normalized.chars().count();
        if length == WORD_LENGTH {
            Ok(Self(normalized))
        } else {
            Err(NormalizationReject { normalized, length })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedWord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
