//! Corpus-based conformance testing.
//!
//! Loads test vectors from a JSON corpus and runs them against the codec.
//! Each vector names an operation, an input (as text or hex) and either the
//! expected successful result or the expected error name and offset.
//!
//! ```json
//! {
//!   "id": "dict-unsorted-strict",
//!   "op": "decode_strict",
//!   "input": "d3:fooi1e3:bari2ee",
//!   "expected": { "err": { "name": "InvalidKeyOrder", "offset": 9 } }
//! }
//! ```
//!
//! For a successful `decode_strict` vector without an explicit `canonical`
//! expectation, the input itself must re-encode byte for byte.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{ConformanceError, ConformanceResult};
use crate::bencode::{decode_with_options, encode, validate_canonical, DecodeOptions};
use crate::error::DecodeResult;

/// Corpus manifest with metadata.
#[derive(Debug, Deserialize)]
pub struct CorpusManifest {
    /// Format version of the corpus file.
    pub format_version: String,
    /// Human-readable description of the corpus.
    #[serde(default)]
    pub description: String,
}

/// A corpus containing test vectors.
#[derive(Debug, Deserialize)]
pub struct Corpus {
    /// Corpus metadata.
    pub manifest: CorpusManifest,
    /// List of test vectors.
    pub vectors: Vec<TestVector>,
}

/// A single test vector.
#[derive(Debug, Deserialize)]
pub struct TestVector {
    /// Unique identifier for the test.
    pub id: String,
    /// Operation to test (`decode_strict`, `decode_lenient`, `validate_canonical`).
    pub op: String,
    /// Input as text.
    #[serde(default)]
    pub input: Option<String>,
    /// Input as hex, for binary payloads.
    #[serde(default)]
    pub input_hex: Option<String>,
    /// Optional nesting limit override.
    #[serde(default)]
    pub max_nesting_depth: Option<usize>,
    /// Expected result (success or error).
    pub expected: Expected,
}

/// Expected outcome of a vector.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expected {
    /// The operation succeeds.
    Ok(OkExpectation),
    /// The operation fails.
    Err(ErrExpectation),
}

/// Expectations for a successful decode.
#[derive(Debug, Default, Deserialize)]
pub struct OkExpectation {
    /// Diagnostic rendering of the decoded value.
    #[serde(default)]
    pub render: Option<String>,
    /// Canonical re-encoding as text.
    #[serde(default)]
    pub canonical: Option<String>,
    /// Canonical re-encoding as hex.
    #[serde(default)]
    pub canonical_hex: Option<String>,
}

/// Expectations for a failed decode.
#[derive(Debug, Deserialize)]
pub struct ErrExpectation {
    /// Error name, e.g. `MalformedNumber`.
    pub name: String,
    /// Byte offset, if the vector pins it.
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Result of running a single test vector.
#[derive(Debug)]
pub enum TestResult {
    /// The codec matched every expectation.
    Pass,
    /// The codec disagreed with the vector.
    Fail {
        /// Expected outcome from the corpus.
        expected: String,
        /// Outcome produced by the codec.
        actual: String,
    },
    /// The vector names an operation this runner does not know.
    Skip {
        /// Why the vector was not run.
        reason: String,
    },
    /// The vector itself is unusable (bad hex, no input).
    Error {
        /// What is wrong with the vector.
        message: String,
    },
}

impl TestResult {
    /// Returns true if this is a passing result.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if this is a failing result.
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    /// Failures and broken vectors both need attention.
    fn is_problem(&self) -> bool {
        matches!(self, Self::Fail { .. } | Self::Error { .. })
    }
}

/// One vector's id and result.
#[derive(Debug)]
pub struct VectorOutcome {
    /// Vector id from the corpus.
    pub id: String,
    /// What happened when it ran.
    pub result: TestResult,
}

impl fmt::Display for VectorOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            TestResult::Pass => write!(f, "{}: ok", self.id),
            TestResult::Fail { expected, actual } => {
                write!(f, "{}: expected {}, got {}", self.id, expected, actual)
            }
            TestResult::Skip { reason } => write!(f, "{}: skipped ({})", self.id, reason),
            TestResult::Error { message } => write!(f, "{}: broken vector: {}", self.id, message),
        }
    }
}

/// Tally of a corpus run, in corpus order.
#[derive(Debug, Default)]
pub struct CorpusResults {
    /// Vectors that passed.
    pub passed: usize,
    /// Vectors the codec disagreed with.
    pub failed: usize,
    /// Vectors with an unknown operation.
    pub skipped: usize,
    /// Vectors that could not be run.
    pub errors: usize,
    /// Every outcome, in the order the vectors appear.
    pub outcomes: Vec<VectorOutcome>,
}

impl CorpusResults {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome and keep it for reporting.
    pub fn record(&mut self, id: impl Into<String>, result: TestResult) {
        let counter = match &result {
            TestResult::Pass => &mut self.passed,
            TestResult::Fail { .. } => &mut self.failed,
            TestResult::Skip { .. } => &mut self.skipped,
            TestResult::Error { .. } => &mut self.errors,
        };
        *counter += 1;
        self.outcomes.push(VectorOutcome {
            id: id.into(),
            result,
        });
    }

    /// Number of vectors recorded.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// True when nothing failed and no vector was broken. Skips are allowed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// Failed and broken vectors, in corpus order.
    pub fn problems(&self) -> impl Iterator<Item = &VectorOutcome> + '_ {
        self.outcomes.iter().filter(|o| o.result.is_problem())
    }
}

impl fmt::Display for CorpusResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} passed, {} failed, {} skipped, {} broken",
            self.passed,
            self.total(),
            self.failed,
            self.skipped,
            self.errors
        )
    }
}

/// Corpus runner that executes test vectors.
pub struct CorpusRunner {
    corpus: Corpus,
}

impl CorpusRunner {
    /// Load corpus from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> ConformanceResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Load corpus from JSON text.
    pub fn from_json(content: &str) -> ConformanceResult<Self> {
        let corpus: Corpus = serde_json::from_str(content)?;
        if corpus.manifest.format_version != "1" {
            return Err(ConformanceError::UnsupportedVersion(
                corpus.manifest.format_version,
            ));
        }
        Ok(Self { corpus })
    }

    /// Get the corpus manifest.
    pub fn manifest(&self) -> &CorpusManifest {
        &self.corpus.manifest
    }

    /// Get the number of test vectors.
    pub fn vector_count(&self) -> usize {
        self.corpus.vectors.len()
    }

    /// Run all test vectors and return results.
    pub fn run_all(&self) -> CorpusResults {
        let mut results = CorpusResults::new();

        for vector in &self.corpus.vectors {
            let result = self.run_vector(vector);
            results.record(&vector.id, result);
        }

        results
    }

    /// Run a single test vector.
    fn run_vector(&self, vector: &TestVector) -> TestResult {
        let input = match vector_input(vector) {
            Ok(bytes) => bytes,
            Err(message) => return TestResult::Error { message },
        };

        let mut options = match vector.op.as_str() {
            "decode_strict" | "validate_canonical" => DecodeOptions::strict(),
            "decode_lenient" => DecodeOptions::lenient(),
            _ => {
                return TestResult::Skip {
                    reason: format!("Unknown operation: {}", vector.op),
                }
            }
        };
        if let Some(depth) = vector.max_nesting_depth {
            options = options.with_max_nesting_depth(depth);
        }

        if vector.op == "validate_canonical" {
            return check_outcome(&vector.expected, validate_canonical(&input, options));
        }

        match (&vector.expected, decode_with_options(&input, options)) {
            (Expected::Ok(ok), Ok(value)) => check_ok(
                ok,
                &value.to_string(),
                &encode(&value),
                &input,
                vector.op == "decode_strict",
            ),
            (expected, result) => check_outcome(expected, result.map(|_| ())),
        }
    }
}

/// Resolve the vector's input bytes.
fn vector_input(vector: &TestVector) -> Result<Vec<u8>, String> {
    match (&vector.input, &vector.input_hex) {
        (Some(text), None) => Ok(text.as_bytes().to_vec()),
        (None, Some(hex_str)) => hex::decode(hex_str).map_err(|e| format!("Invalid hex: {}", e)),
        _ => Err("Exactly one of 'input' and 'input_hex' is required".to_string()),
    }
}

/// Compare an outcome whose success carries nothing left to check.
fn check_outcome(expected: &Expected, result: DecodeResult<()>) -> TestResult {
    match (expected, result) {
        (Expected::Ok(_), Ok(_)) => TestResult::Pass,
        (Expected::Ok(_), Err(e)) => TestResult::Fail {
            expected: "ok".to_string(),
            actual: format!("err: {} at {:?}", e.name(), e.offset()),
        },
        (Expected::Err(err), Ok(_)) => TestResult::Fail {
            expected: format!("err: {}", err.name),
            actual: "ok".to_string(),
        },
        (Expected::Err(err), Err(e)) => {
            let name_matches = e.name() == err.name;
            let offset_matches = err.offset.is_none() || err.offset == e.offset();
            if name_matches && offset_matches {
                TestResult::Pass
            } else {
                TestResult::Fail {
                    expected: format!("{} at {:?}", err.name, err.offset),
                    actual: format!("{} at {:?}", e.name(), e.offset()),
                }
            }
        }
    }
}

/// Compare a successful decode against its expectations.
fn check_ok(
    ok: &OkExpectation,
    render: &str,
    canonical: &[u8],
    input: &[u8],
    round_trip: bool,
) -> TestResult {
    if let Some(expected) = &ok.render {
        if expected != render {
            return TestResult::Fail {
                expected: expected.clone(),
                actual: render.to_string(),
            };
        }
    }

    let expected_canonical = match (&ok.canonical, &ok.canonical_hex) {
        (Some(text), _) => Some(text.as_bytes().to_vec()),
        (None, Some(hex_str)) => match hex::decode(hex_str) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                return TestResult::Error {
                    message: format!("Invalid canonical_hex: {}", e),
                }
            }
        },
        (None, None) if round_trip => Some(input.to_vec()),
        (None, None) => None,
    };

    match expected_canonical {
        Some(expected) if expected != canonical => TestResult::Fail {
            expected: hex::encode(expected),
            actual: hex::encode(canonical),
        },
        _ => TestResult::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(vectors: &str) -> CorpusRunner {
        let json = format!(
            r#"{{"manifest": {{"format_version": "1"}}, "vectors": [{}]}}"#,
            vectors
        );
        CorpusRunner::from_json(&json).unwrap()
    }

    #[test]
    fn test_corpus_results() {
        let mut results = CorpusResults::new();
        results.record("test1", TestResult::Pass);
        results.record("test2", TestResult::Pass);
        results.record(
            "test3",
            TestResult::Fail {
                expected: "a".to_string(),
                actual: "b".to_string(),
            },
        );
        results.record(
            "test4",
            TestResult::Skip {
                reason: "not implemented".to_string(),
            },
        );

        assert_eq!(results.passed, 2);
        assert_eq!(results.failed, 1);
        assert_eq!(results.skipped, 1);
        assert_eq!(results.total(), 4);
        assert!(!results.all_passed());

        let problems: Vec<String> = results.problems().map(|o| o.to_string()).collect();
        assert_eq!(problems, vec!["test3: expected a, got b".to_string()]);
        assert_eq!(
            results.to_string(),
            "2/4 passed, 1 failed, 1 skipped, 0 broken"
        );
    }

    #[test]
    fn test_round_trip_vector() {
        let runner = corpus(
            r#"{"id": "rt", "op": "decode_strict", "input": "li1e1:ae",
                "expected": {"ok": {"render": "[1, \"a\"]"}}}"#,
        );
        let results = runner.run_all();
        assert!(results.all_passed(), "{:?}", results.outcomes);
    }

    #[test]
    fn test_error_vector_checks_offset() {
        let runner = corpus(
            r#"{"id": "eof", "op": "decode_strict", "input": "5:abc",
                "expected": {"err": {"name": "UnexpectedEof", "offset": 4}}}"#,
        );
        let results = runner.run_all();
        assert_eq!(results.failed, 1);
    }

    #[test]
    fn test_hex_and_lenient_vectors() {
        let runner = corpus(
            r#"{"id": "bin", "op": "decode_strict", "input_hex": "323aff00",
                "expected": {"ok": {}}},
               {"id": "len", "op": "decode_lenient", "input": "d1:bi1e1:ai2ee",
                "expected": {"ok": {"canonical": "d1:ai2e1:bi1ee"}}}"#,
        );
        let results = runner.run_all();
        assert_eq!(results.passed, 2, "{:?}", results.outcomes);
    }

    #[test]
    fn test_unknown_op_skipped_and_bad_input_errors() {
        let runner = corpus(
            r#"{"id": "x", "op": "fuzz", "input": "le", "expected": {"ok": {}}},
               {"id": "y", "op": "decode_strict", "expected": {"ok": {}}}"#,
        );
        let results = runner.run_all();
        assert_eq!(results.skipped, 1);
        assert_eq!(results.errors, 1);
    }

    #[test]
    fn test_unsupported_version() {
        let result = CorpusRunner::from_json(r#"{"manifest": {"format_version": "2"}, "vectors": []}"#);
        assert!(matches!(result, Err(ConformanceError::UnsupportedVersion(_))));
    }
}
