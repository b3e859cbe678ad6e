//! Canonical form rules.
//!
//! Canonical bencode has exactly one encoding per value: integers and lengths
//! without leading zeros or `-0`, and dictionary keys in strictly ascending
//! byte-wise order. Number rules are enforced by the scanner; this module owns
//! the key rules, both at decode time (through [`KeyValidator`]) and as a
//! post-hoc check over a whole buffer.

use std::cmp::Ordering;

use tracing::{debug, trace};

use super::decoder::decode_with_options;
use super::encoder::encode;
use super::options::DecodeOptions;
use super::types::{Dictionary, Value};
use crate::error::{DecodeError, DecodeResult};

/// How the decoder treats dictionary key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrderPolicy {
    /// Each key must sort strictly after the previous one.
    #[default]
    Strict,
    /// Keys may arrive in any order and are re-sorted.
    Lenient,
}

/// What lenient decoding does with a key seen twice in one dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeyPolicy {
    /// Keep the value of the last occurrence.
    #[default]
    LastWins,
    /// Fail with `DuplicateKey`.
    Reject,
}

/// Compare two keys in canonical order (unsigned bytes, shorter-is-less).
pub fn compare_keys(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Per-dictionary key checker used by the decoder.
///
/// `check` runs as soon as a key is read, before its value is parsed, so a
/// violation is reported at the key's own offset. `insert` stores the entry
/// once the value is complete.
#[derive(Debug)]
pub struct KeyValidator {
    key_order: KeyOrderPolicy,
    duplicate_keys: DuplicateKeyPolicy,
    entries: Dictionary,
    last_key: Option<Vec<u8>>,
    reordered: bool,
}

impl KeyValidator {
    /// Create a validator for one dictionary.
    pub fn new(options: &DecodeOptions) -> Self {
        Self {
            key_order: options.key_order,
            duplicate_keys: options.duplicate_keys,
            entries: Dictionary::new(),
            last_key: None,
            reordered: false,
        }
    }

    /// Validate a freshly read key located at `offset`.
    pub fn check(&mut self, key: &[u8], offset: usize) -> DecodeResult<()> {
        let order = self
            .last_key
            .as_deref()
            .map(|last| compare_keys(key, last))
            .unwrap_or(Ordering::Greater);

        match self.key_order {
            KeyOrderPolicy::Strict => match order {
                Ordering::Greater => Ok(()),
                Ordering::Equal => Err(duplicate(key, offset)),
                Ordering::Less => Err(DecodeError::InvalidKeyOrder { offset }),
            },
            KeyOrderPolicy::Lenient => {
                if order == Ordering::Less {
                    self.reordered = true;
                }
                if self.entries.contains_key(key) {
                    match self.duplicate_keys {
                        DuplicateKeyPolicy::Reject => return Err(duplicate(key, offset)),
                        DuplicateKeyPolicy::LastWins => {
                            debug!(offset, "duplicate dictionary key, keeping last value");
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Store a checked key with its decoded value.
    pub fn insert(&mut self, key: Vec<u8>, value: Value) {
        self.last_key = Some(key.clone());
        self.entries.insert(key, value);
    }

    /// Finish the dictionary, yielding entries in canonical order.
    pub fn finish(self) -> Dictionary {
        if self.reordered {
            trace!(entries = self.entries.len(), "re-sorted dictionary keys");
        }
        self.entries
    }
}

fn duplicate(key: &[u8], offset: usize) -> DecodeError {
    DecodeError::DuplicateKey {
        offset,
        key: String::from_utf8_lossy(key).into_owned(),
    }
}

/// Post-hoc validation: succeed only if `input` is canonical bencode.
///
/// Strict decoding already rejects every non-canonical construct, so this is a
/// strict decode that discards the tree.
pub fn validate_canonical(input: &[u8], options: DecodeOptions) -> DecodeResult<()> {
    let strict = options
        .with_key_order(KeyOrderPolicy::Strict)
        .with_duplicate_keys(DuplicateKeyPolicy::Reject);
    decode_with_options(input, strict).map(|_| ())
}

/// Check whether `input` is exactly the canonical encoding of `value`.
pub fn is_canonical(input: &[u8], value: &Value) -> bool {
    encode(value) == input
}
