//! Canonical bencode encoder.
//!
//! The inverse of the decoder. Encoding is total: every in-memory [`Value`] is
//! already canonical by construction (integers are `i64`, dictionary keys live
//! in a sorted map), so the output is the unique canonical form and
//! `decode(encode(v)) == v` holds for every value.
//!
//! Encoding recurses once per container level, like decoding. Decoded trees
//! are bounded by [`DecodeOptions::max_nesting_depth`]; trees built in memory
//! must stay within the same kind of bound. A tree nested many thousands of
//! levels deep exhausts the stack here, as it also does when dropped.
//!
//! [`DecodeOptions::max_nesting_depth`]: super::options::DecodeOptions::max_nesting_depth

use super::types::Value;

/// Serialize a value to canonical bencode.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut output = Vec::with_capacity(encoded_len(value));
    encode_into(value, &mut output);
    output
}

/// Append the canonical encoding of `value` to `output`.
pub fn encode_into(value: &Value, output: &mut Vec<u8>) {
    match value {
        Value::Integer(n) => {
            output.push(b'i');
            output.extend_from_slice(itoa::Buffer::new().format(*n).as_bytes());
            output.push(b'e');
        }
        Value::ByteString(bytes) => encode_bytes(bytes, output),
        Value::List(items) => {
            output.push(b'l');
            for item in items {
                encode_into(item, output);
            }
            output.push(b'e');
        }
        Value::Dictionary(map) => {
            output.push(b'd');
            // BTreeMap iterates in canonical key order.
            for (key, item) in map {
                encode_bytes(key, output);
                encode_into(item, output);
            }
            output.push(b'e');
        }
    }
}

/// Exact number of bytes `encode` will produce for `value`.
pub fn encoded_len(value: &Value) -> usize {
    match value {
        Value::Integer(n) => 2 + itoa::Buffer::new().format(*n).len(),
        Value::ByteString(bytes) => bytes_len(bytes),
        Value::List(items) => 2 + items.iter().map(encoded_len).sum::<usize>(),
        Value::Dictionary(map) => {
            2 + map
                .iter()
                .map(|(key, item)| bytes_len(key) + encoded_len(item))
                .sum::<usize>()
        }
    }
}

fn encode_bytes(bytes: &[u8], output: &mut Vec<u8>) {
    output.extend_from_slice(itoa::Buffer::new().format(bytes.len()).as_bytes());
    output.push(b':');
    output.extend_from_slice(bytes);
}

fn bytes_len(bytes: &[u8]) -> usize {
    itoa::Buffer::new().format(bytes.len()).len() + 1 + bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::decoder::decode;
    use crate::bencode::options::DEFAULT_MAX_NESTING_DEPTH;
    use crate::bencode::types::Dictionary;

    #[test]
    fn test_encode_integers() {
        assert_eq!(encode(&Value::Integer(0)), b"i0e");
        assert_eq!(encode(&Value::Integer(42)), b"i42e");
        assert_eq!(encode(&Value::Integer(-42)), b"i-42e");
        assert_eq!(
            encode(&Value::Integer(i64::MIN)),
            b"i-9223372036854775808e"
        );
    }

    #[test]
    fn test_encode_byte_strings() {
        assert_eq!(encode(&Value::bytes("spam")), b"4:spam");
        assert_eq!(encode(&Value::bytes("")), b"0:");
        assert_eq!(encode(&Value::bytes(vec![0xFF, 0x00])), b"2:\xFF\x00");
    }

    #[test]
    fn test_encode_containers() {
        assert_eq!(encode(&Value::List(vec![])), b"le");
        assert_eq!(encode(&Value::Dictionary(Dictionary::new())), b"de");
        let list = Value::List(vec![Value::Integer(1), Value::bytes("a")]);
        assert_eq!(encode(&list), b"li1e1:ae");
    }

    #[test]
    fn test_encode_sorts_keys() {
        let value = Value::dictionary([
            ("foo", Value::Integer(1)),
            ("bar", Value::bytes("spam")),
            ("ba", Value::List(vec![])),
        ]);
        assert_eq!(encode(&value), b"d2:bale3:bar4:spam3:fooi1ee");
    }

    #[test]
    fn test_encoded_len_matches() {
        let value = Value::List(vec![
            Value::Integer(-1234567),
            Value::bytes(vec![7; 120]),
            Value::dictionary([("k", Value::List(vec![Value::Integer(0)]))]),
        ]);
        assert_eq!(encoded_len(&value), encode(&value).len());
    }

    #[test]
    fn test_encode_at_default_nesting_limit() {
        let mut value = Value::Integer(0);
        for _ in 0..DEFAULT_MAX_NESTING_DEPTH {
            value = Value::List(vec![value]);
        }

        let bytes = encode(&value);
        assert_eq!(bytes.len(), encoded_len(&value));
        assert_eq!(decode(&bytes).unwrap(), value);

        let too_deep = encode(&Value::List(vec![value]));
        assert!(matches!(
            decode(&too_deep),
            Err(crate::error::DecodeError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn test_encode_into_appends() {
        let mut output = b"prefix".to_vec();
        encode_into(&Value::Integer(7), &mut output);
        assert_eq!(output, b"prefixi7e");
    }
}
