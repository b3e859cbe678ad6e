//! Recursive descent decoder.
//!
//! One byte of lookahead selects the production:
//!
//! - `i` integer, `i<digits>e` with an optional `-`
//! - `0`..`9` byte string, `<len>:<bytes>`
//! - `l` list, values until `e`
//! - `d` dictionary, byte string key / value pairs until `e`
//!
//! Recursion depth equals container nesting, which is bounded by
//! [`DecodeOptions::max_nesting_depth`]. The first error aborts the whole
//! decode; no partial tree is ever returned.

use tracing::{debug, trace};

use super::canonical::KeyValidator;
use super::options::DecodeOptions;
use super::scanner::Scanner;
use super::types::Value;
use crate::error::{DecodeError, DecodeResult};

/// Bencode decoder over one input buffer.
pub struct Decoder<'a> {
    scanner: Scanner<'a>,
    options: DecodeOptions,
    depth: usize,
}

impl<'a> Decoder<'a> {
    /// Create a new decoder for the given input.
    pub fn new(input: &'a [u8], options: DecodeOptions) -> DecodeResult<Self> {
        if input.len() > options.max_input_size {
            return Err(DecodeError::InputTooLarge {
                size: input.len(),
                limit: options.max_input_size,
            });
        }

        Ok(Self {
            scanner: Scanner::new(input),
            options,
            depth: 0,
        })
    }

    /// Decode exactly one value spanning the whole input.
    pub fn decode(&mut self) -> DecodeResult<Value> {
        let value = self.decode_value()?;

        if !self.scanner.is_at_end() {
            return Err(DecodeError::TrailingData {
                offset: self.scanner.position(),
            });
        }

        Ok(value)
    }

    /// Decode a single value, dispatching on the next byte.
    fn decode_value(&mut self) -> DecodeResult<Value> {
        match self.scanner.peek() {
            Some(b'i') => self.decode_integer().map(Value::Integer),
            Some(b'0'..=b'9') => self.decode_byte_string().map(Value::ByteString),
            Some(b'l') => self.decode_list(),
            Some(b'd') => self.decode_dictionary(),
            Some(found) => Err(DecodeError::UnexpectedToken {
                offset: self.scanner.position(),
                found,
            }),
            None => Err(DecodeError::UnexpectedEof {
                offset: self.scanner.position(),
            }),
        }
    }

    /// Parse `i[-]<digits>e`.
    fn decode_integer(&mut self) -> DecodeResult<i64> {
        self.scanner.expect_literal(b'i')?;

        let sign_offset = self.scanner.position();
        let negative = self.scanner.peek() == Some(b'-');
        if negative {
            self.scanner.expect_literal(b'-')?;
        }

        let digits_offset = self.scanner.position();
        let magnitude = self.scanner.read_decimal()?;

        let value = if negative {
            if magnitude == 0 {
                return Err(DecodeError::MalformedNumber {
                    offset: sign_offset,
                    reason: "negative zero",
                });
            }
            if magnitude == i64::MIN.unsigned_abs() {
                i64::MIN
            } else {
                i64::try_from(magnitude).map(|m| -m).map_err(|_| out_of_range(digits_offset))?
            }
        } else {
            i64::try_from(magnitude).map_err(|_| out_of_range(digits_offset))?
        };

        self.scanner.expect_literal(b'e')?;
        Ok(value)
    }

    /// Parse `<len>:<bytes>`, copying the bytes out of the input.
    fn decode_byte_string(&mut self) -> DecodeResult<Vec<u8>> {
        let offset = self.scanner.position();
        let length = self.scanner.read_decimal()?;

        let limit = self.options.max_string_length;
        let length = usize::try_from(length)
            .ok()
            .filter(|&len| len <= limit)
            .ok_or(DecodeError::StringTooLong {
                offset,
                length,
                limit,
            })?;

        self.scanner.expect_literal(b':')?;
        Ok(self.scanner.advance(length)?.to_vec())
    }

    /// Parse `l<value>*e`.
    fn decode_list(&mut self) -> DecodeResult<Value> {
        self.enter()?;
        self.scanner.expect_literal(b'l')?;

        let mut items = Vec::new();
        while self.scanner.peek() != Some(b'e') {
            items.push(self.decode_value()?);
        }
        self.scanner.expect_literal(b'e')?;

        self.depth -= 1;
        Ok(Value::List(items))
    }

    /// Parse `d(<byte string><value>)*e`.
    fn decode_dictionary(&mut self) -> DecodeResult<Value> {
        self.enter()?;
        self.scanner.expect_literal(b'd')?;

        let mut keys = KeyValidator::new(&self.options);
        loop {
            let key_offset = self.scanner.position();
            match self.scanner.peek() {
                Some(b'e') => break,
                Some(b'0'..=b'9') => {}
                Some(found) => {
                    return Err(DecodeError::UnexpectedToken {
                        offset: key_offset,
                        found,
                    })
                }
                None => return Err(DecodeError::UnexpectedEof { offset: key_offset }),
            }

            let key = self.decode_byte_string()?;
            keys.check(&key, key_offset)?;
            let value = self.decode_value()?;
            keys.insert(key, value);
        }
        self.scanner.expect_literal(b'e')?;

        self.depth -= 1;
        Ok(Value::Dictionary(keys.finish()))
    }

    /// Open a container, enforcing the nesting limit.
    fn enter(&mut self) -> DecodeResult<()> {
        self.depth += 1;
        if self.depth > self.options.max_nesting_depth {
            return Err(DecodeError::NestingTooDeep {
                offset: self.scanner.position(),
                limit: self.options.max_nesting_depth,
            });
        }
        Ok(())
    }
}

fn out_of_range(offset: usize) -> DecodeError {
    DecodeError::MalformedNumber {
        offset,
        reason: "integer out of 64-bit range",
    }
}

/// Decode a buffer in strict (canonical) mode with default limits.
pub fn decode(input: &[u8]) -> DecodeResult<Value> {
    decode_with_options(input, DecodeOptions::strict())
}

/// Decode a buffer with explicit options.
pub fn decode_with_options(input: &[u8], options: DecodeOptions) -> DecodeResult<Value> {
    trace!(len = input.len(), key_order = ?options.key_order, "decoding");
    let result = Decoder::new(input, options).and_then(|mut decoder| decoder.decode());
    if let Err(err) = &result {
        debug!(code = err.code(), offset = ?err.offset(), "decode failed: {}", err);
    }
    result
}
