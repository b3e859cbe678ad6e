//! Torrent metainfo extraction.
//!
//! Interprets a decoded bencode dictionary as a `.torrent` file (BEP 3, with
//! the `announce-list` extension of BEP 12 and the private flag of BEP 27).
//! Nothing here parses bytes: the input is decoded by [`crate::bencode`] and
//! fields are pulled out with the typed `Value` accessors, so a field of the
//! wrong kind surfaces as the underlying `TypeMismatch`.
//!
//! # Example
//!
//! ```
//! use rush_bencode::Metainfo;
//!
//! let torrent = b"d8:announce13:http://t/anno4:infod6:lengthi5e4:name5:a.txt\
//!                 12:piece lengthi16384e6:pieces0:ee";
//! let meta = Metainfo::from_bytes(torrent).unwrap();
//! assert_eq!(meta.announce, "http://t/anno");
//! assert_eq!(meta.info.layout.total_length(), Some(5));
//! ```

mod extract;
pub mod types;

use thiserror::Error;

pub use types::{FileEntry, FileLayout, Info, Metainfo, PieceHash, PIECE_HASH_LEN};

use crate::bencode::{decode_with_options, DecodeOptions, Value};
use crate::error::DecodeError;

/// Errors from metainfo extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetainfoError {
    /// The input is not valid bencode.
    #[error("invalid bencode: {0}")]
    Decode(#[from] DecodeError),

    /// A required field is absent.
    #[error("missing field {0:?}")]
    MissingField(&'static str),

    /// A field holds the wrong kind of value.
    #[error("field {field:?}: {source}")]
    WrongType {
        /// The field being read
        field: &'static str,
        /// The underlying `TypeMismatch`
        source: DecodeError,
    },

    /// A text field is not valid UTF-8.
    #[error("field {0:?} is not valid UTF-8")]
    InvalidText(&'static str),

    /// A field has the right kind but an unusable value.
    #[error("field {field:?}: {reason}")]
    InvalidField {
        /// The field being read
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type for metainfo extraction.
pub type MetainfoResult<T> = Result<T, MetainfoError>;

impl Metainfo {
    /// Decode a torrent file in strict mode and extract its metainfo.
    pub fn from_bytes(input: &[u8]) -> MetainfoResult<Self> {
        Self::from_bytes_with_options(input, DecodeOptions::strict())
    }

    /// Decode a torrent file with explicit options and extract its metainfo.
    pub fn from_bytes_with_options(input: &[u8], options: DecodeOptions) -> MetainfoResult<Self> {
        let value = decode_with_options(input, options)?;
        Self::from_value(&value)
    }

    /// Extract metainfo from an already decoded value.
    pub fn from_value(value: &Value) -> MetainfoResult<Self> {
        extract::parse_metainfo(value)
    }
}
