//! Rush Bencode - strict, canonical bencode codec.
//!
//! This crate decodes untrusted bencode into an owned [`Value`] tree and
//! encodes values back into their unique canonical byte form.
//!
//! # Architecture
//!
//! - [`bencode`] - value model, scanner, decoder, canonical validator, encoder
//! - [`metainfo`] - typed torrent metainfo extraction over decoded values
//! - [`conformance`] - JSON test-vector corpus runner
//! - [`error`] - error taxonomy with stable codes and byte offsets
//!
//! # Canonical form
//!
//! Strict decoding (the default) accepts only canonical input, so any buffer it
//! accepts re-encodes to exactly the same bytes. Lenient decoding accepts
//! unsorted and repeated dictionary keys and normalizes them.

// Decoding hostile input must never panic.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod bencode;
pub mod conformance;
pub mod error;
pub mod metainfo;

// Re-export commonly used types
pub use bencode::{decode, decode_with_options, encode, DecodeOptions, Value, ValueKind};
pub use error::{DecodeError, DecodeResult};
pub use metainfo::{Metainfo, MetainfoError};
