//! Bencode decoding and canonical encoding.
//!
//! Bencode is a self-describing, length-prefixed format with four value kinds:
//! integers, byte strings, lists and byte-string keyed dictionaries. Inputs are
//! treated as untrusted: decoding is bounds-checked, depth-limited and fails
//! with the first error it sees.
//!
//! # Architecture
//!
//! - [`types`] - the `Value` tree
//! - [`options`] - decode limits and key policies
//! - [`scanner`] - bounds-checked byte cursor
//! - [`decoder`] - recursive descent over the four productions
//! - [`canonical`] - key ordering rules and canonical-form checks
//! - [`encoder`] - canonical serialization
//!
//! # Example
//!
//! ```
//! use rush_bencode::bencode::{decode, encode, Value};
//!
//! let value = decode(b"d3:bar4:spam3:fooi42ee").unwrap();
//! assert_eq!(value.get("foo"), Some(&Value::Integer(42)));
//!
//! // Canonical input round-trips byte for byte
//! assert_eq!(encode(&value), b"d3:bar4:spam3:fooi42ee");
//! ```

pub mod canonical;
pub mod decoder;
pub mod encoder;
pub mod options;
pub mod scanner;
pub mod types;

// Re-export commonly used items
pub use canonical::{is_canonical, validate_canonical, DuplicateKeyPolicy, KeyOrderPolicy};
pub use decoder::{decode, decode_with_options, Decoder};
pub use encoder::{encode, encode_into, encoded_len};
pub use options::DecodeOptions;
pub use scanner::Scanner;
pub use types::{Dictionary, Value, ValueKind};
