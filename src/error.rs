//! Error handling for the bencode codec.
//!
//! Every failure is reported as a [`DecodeError`] carrying the byte offset at
//! which it was detected. Each variant also has a stable numeric code and a
//! name so the CLI and the conformance corpus can match errors without relying
//! on `Display` text.
//!
//! | code | name            |
//! |------|-----------------|
//! | 100  | UnexpectedEof   |
//! | 101  | UnexpectedToken |
//! | 102  | MalformedNumber |
//! | 103  | InvalidKeyOrder |
//! | 104  | DuplicateKey    |
//! | 105  | NestingTooDeep  |
//! | 106  | TrailingData    |
//! | 110  | InputTooLarge   |
//! | 111  | StringTooLong   |
//! | 200  | TypeMismatch    |

use thiserror::Error;

use crate::bencode::ValueKind;

/// All errors produced by decoding or by typed extraction from a [`Value`].
///
/// [`Value`]: crate::bencode::Value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum DecodeError {
    /// Input ended in the middle of a production.
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEof {
        /// Offset at which more input was required.
        offset: usize,
    },

    /// The byte at `offset` does not start or continue any production.
    #[error("unexpected byte {} at byte {offset}", found.escape_ascii())]
    UnexpectedToken {
        /// Offset of the offending byte.
        offset: usize,
        /// The byte that was found.
        found: u8,
    },

    /// An integer or length prefix is not a canonical decimal number.
    #[error("malformed number at byte {offset}: {reason}")]
    MalformedNumber {
        /// Offset of the first byte of the number (or its sign).
        offset: usize,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A dictionary key sorts before the key preceding it.
    #[error("dictionary key out of order at byte {offset}")]
    InvalidKeyOrder {
        /// Offset of the offending key's length prefix.
        offset: usize,
    },

    /// A dictionary key appears twice in the same dictionary.
    #[error("duplicate dictionary key {key:?} at byte {offset}")]
    DuplicateKey {
        /// Offset of the second occurrence's length prefix.
        offset: usize,
        /// The key, rendered lossily as text.
        key: String,
    },

    /// Containers are nested deeper than the configured limit.
    #[error("nesting deeper than {limit} at byte {offset}")]
    NestingTooDeep {
        /// Offset of the container that crossed the limit.
        offset: usize,
        /// The configured maximum depth.
        limit: usize,
    },

    /// Bytes remain after a complete top-level value.
    #[error("trailing data at byte {offset}")]
    TrailingData {
        /// Offset of the first unconsumed byte.
        offset: usize,
    },

    /// The input buffer is larger than the configured maximum.
    #[error("input of {size} bytes exceeds limit of {limit}")]
    InputTooLarge {
        /// Size of the rejected buffer.
        size: usize,
        /// The configured maximum size.
        limit: usize,
    },

    /// A byte string declares a length above the configured maximum.
    #[error("byte string of {length} bytes at byte {offset} exceeds limit of {limit}")]
    StringTooLong {
        /// Offset of the length prefix.
        offset: usize,
        /// The declared length.
        length: u64,
        /// The configured maximum length.
        limit: usize,
    },

    /// A caller asked a value for a variant it does not hold.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// The requested variant.
        expected: ValueKind,
        /// The variant actually held.
        found: ValueKind,
    },
}

impl DecodeError {
    /// Get the numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            DecodeError::UnexpectedEof { .. } => 100,
            DecodeError::UnexpectedToken { .. } => 101,
            DecodeError::MalformedNumber { .. } => 102,
            DecodeError::InvalidKeyOrder { .. } => 103,
            DecodeError::DuplicateKey { .. } => 104,
            DecodeError::NestingTooDeep { .. } => 105,
            DecodeError::TrailingData { .. } => 106,
            DecodeError::InputTooLarge { .. } => 110,
            DecodeError::StringTooLong { .. } => 111,
            DecodeError::TypeMismatch { .. } => 200,
        }
    }

    /// Get the error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            DecodeError::UnexpectedEof { .. } => "UnexpectedEof",
            DecodeError::UnexpectedToken { .. } => "UnexpectedToken",
            DecodeError::MalformedNumber { .. } => "MalformedNumber",
            DecodeError::InvalidKeyOrder { .. } => "InvalidKeyOrder",
            DecodeError::DuplicateKey { .. } => "DuplicateKey",
            DecodeError::NestingTooDeep { .. } => "NestingTooDeep",
            DecodeError::TrailingData { .. } => "TrailingData",
            DecodeError::InputTooLarge { .. } => "InputTooLarge",
            DecodeError::StringTooLong { .. } => "StringTooLong",
            DecodeError::TypeMismatch { .. } => "TypeMismatch",
        }
    }

    /// Byte offset at which the error was detected.
    ///
    /// `TypeMismatch` is raised on an already decoded value and has no offset.
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::UnexpectedEof { offset }
            | DecodeError::UnexpectedToken { offset, .. }
            | DecodeError::MalformedNumber { offset, .. }
            | DecodeError::InvalidKeyOrder { offset }
            | DecodeError::DuplicateKey { offset, .. }
            | DecodeError::NestingTooDeep { offset, .. }
            | DecodeError::TrailingData { offset }
            | DecodeError::StringTooLong { offset, .. } => Some(*offset),
            DecodeError::InputTooLarge { .. } => Some(0),
            DecodeError::TypeMismatch { .. } => None,
        }
    }
}

/// Result type for codec operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
