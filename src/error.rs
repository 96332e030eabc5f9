// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures of a build run. Per-word rejections are not errors; see
/// [`crate::core::normalizer::NormalizationReject`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("malformed input in {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("unsupported character U+{code_point:04X} in word {word:?}: only BMP code points fit a 16-bit record")]
    EncodingUnsupported { word: String, code_point: u32 },

    #[error("size invariant violated: {0}")]
    SizeInvariantViolation(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed artifact: {0}")]
    MalformedArtifact(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
