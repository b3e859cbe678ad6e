//! Test-vector conformance for the codec.
//!
//! Vectors live in a JSON corpus (`corpus/corpus.json`) so that other bencode
//! implementations can be checked against the same expectations, including
//! error names and byte offsets.

pub mod corpus;

use thiserror::Error;

pub use corpus::{
    Corpus, CorpusManifest, CorpusResults, CorpusRunner, ErrExpectation, Expected,
    OkExpectation, TestResult, TestVector, VectorOutcome,
};

/// Result type for conformance operations.
pub type ConformanceResult<T> = Result<T, ConformanceError>;

/// Errors that can occur while loading a corpus.
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// The corpus file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The corpus is not valid JSON or does not match the vector schema.
    #[error("invalid corpus: {0}")]
    Json(#[from] serde_json::Error),

    /// The corpus declares a format version this runner does not know.
    #[error("unsupported corpus format version {0:?}")]
    UnsupportedVersion(String),
}
