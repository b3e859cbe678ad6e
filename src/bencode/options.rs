//! Decode configuration.
//!
//! The grammar itself places no bound on nesting or sizes, so everything that
//! protects the decoder from hostile input lives here. `NestingTooDeep` is the
//! one limit that guards the call stack; the size limits bound allocation.

use super::canonical::{DuplicateKeyPolicy, KeyOrderPolicy};

/// Default maximum container nesting depth.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// Default maximum input size (64 MiB).
pub const DEFAULT_MAX_INPUT_SIZE: usize = 64 * 1024 * 1024;

/// Default maximum declared byte string length (16 MiB).
pub const DEFAULT_MAX_STRING_LENGTH: usize = 16 * 1024 * 1024;

/// Options controlling a single decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum number of simultaneously open lists/dictionaries
    pub max_nesting_depth: usize,
    /// How dictionary key order is enforced
    pub key_order: KeyOrderPolicy,
    /// What lenient mode does with repeated keys
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Maximum total input size in bytes
    pub max_input_size: usize,
    /// Maximum declared length of a single byte string
    pub max_string_length: usize,
}

impl DecodeOptions {
    /// Canonical-form decoding: sorted, unique keys are required.
    pub const fn strict() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            key_order: KeyOrderPolicy::Strict,
            duplicate_keys: DuplicateKeyPolicy::Reject,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }

    /// Accept keys in any order and keep the last value of a repeated key.
    pub const fn lenient() -> Self {
        Self {
            key_order: KeyOrderPolicy::Lenient,
            duplicate_keys: DuplicateKeyPolicy::LastWins,
            ..Self::strict()
        }
    }

    /// Replace the nesting depth limit.
    pub const fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Replace the key order policy.
    pub const fn with_key_order(mut self, policy: KeyOrderPolicy) -> Self {
        self.key_order = policy;
        self
    }

    /// Replace the duplicate key policy.
    pub const fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }

    /// Replace the input size limit.
    pub const fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// Replace the byte string length limit.
    pub const fn with_max_string_length(mut self, length: usize) -> Self {
        self.max_string_length = length;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::strict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_strict() {
        let options = DecodeOptions::default();
        assert_eq!(options, DecodeOptions::strict());
        assert_eq!(options.key_order, KeyOrderPolicy::Strict);
        assert_eq!(options.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
    }

    #[test]
    fn test_lenient_keeps_limits() {
        let options = DecodeOptions::lenient();
        assert_eq!(options.key_order, KeyOrderPolicy::Lenient);
        assert_eq!(options.duplicate_keys, DuplicateKeyPolicy::LastWins);
        assert_eq!(options.max_input_size, DEFAULT_MAX_INPUT_SIZE);
        assert_eq!(options.max_string_length, DEFAULT_MAX_STRING_LENGTH);
    }

    #[test]
    fn test_builders() {
        let options = DecodeOptions::lenient()
            .with_max_nesting_depth(4)
            .with_duplicate_keys(DuplicateKeyPolicy::Reject)
            .with_max_input_size(10)
            .with_max_string_length(2);
        assert_eq!(options.max_nesting_depth, 4);
        assert_eq!(options.duplicate_keys, DuplicateKeyPolicy::Reject);
        assert_eq!(options.max_input_size, 10);
        assert_eq!(options.max_string_length, 2);
        assert_eq!(
            options.with_key_order(KeyOrderPolicy::Strict).key_order,
            KeyOrderPolicy::Strict
        );
    }
}
