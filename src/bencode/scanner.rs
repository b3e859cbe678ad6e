//! Bounds-checked cursor over an input buffer.
//!
//! The scanner is the only code that indexes into the input. It never reads
//! past the end of the buffer and never moves backwards; every failure is
//! reported at the offset where it was detected.

use crate::error::{DecodeError, DecodeResult};

/// Cursor over an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner positioned at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Get the current position in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unconsumed bytes.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// True once every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    /// Peek at the current byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Consume and return one byte.
    pub fn next_byte(&mut self) -> DecodeResult<u8> {
        let b = self.peek().ok_or(DecodeError::UnexpectedEof { offset: self.pos })?;
        self.pos += 1;
        Ok(b)
    }

    /// Consume exactly `n` bytes and return them as a slice of the input.
    ///
    /// Fails with `UnexpectedEof` at the end of the buffer if fewer than `n`
    /// bytes remain; nothing is consumed in that case.
    pub fn advance(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(DecodeError::UnexpectedEof {
                offset: self.input.len(),
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.input[start..self.pos])
    }

    /// Consume one byte if it equals `expected`.
    pub fn expect_literal(&mut self, expected: u8) -> DecodeResult<()> {
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(DecodeError::UnexpectedToken {
                offset: self.pos,
                found,
            }),
            None => Err(DecodeError::UnexpectedEof { offset: self.pos }),
        }
    }

    /// Read an unsigned decimal number in canonical form.
    ///
    /// Consumes ASCII digits greedily. A leading `0` is only allowed when it is
    /// the whole number. An empty digit run is `MalformedNumber`, unless the
    /// input simply ended, which is `UnexpectedEof`.
    pub fn read_decimal(&mut self) -> DecodeResult<u64> {
        let start = self.pos;
        let malformed = |reason| DecodeError::MalformedNumber {
            offset: start,
            reason,
        };

        match self.peek() {
            None => return Err(DecodeError::UnexpectedEof { offset: start }),
            Some(b'0'..=b'9') => {}
            Some(_) => return Err(malformed("expected a digit")),
        }

        let mut value: u64 = 0;
        while let Some(b @ b'0'..=b'9') = self.peek() {
            if self.pos > start && value == 0 {
                return Err(malformed("leading zero"));
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(b - b'0')))
                .ok_or_else(|| malformed("number too large"))?;
            self.pos += 1;
        }

        Ok(value)
    }
}
