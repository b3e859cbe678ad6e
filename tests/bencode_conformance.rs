//! Bencode codec conformance tests.
//!
//! Exercises the public API end to end: canonical round trips, rejection of
//! non-canonical numbers, truncation, nesting, dictionary key policies,
//! trailing data and the typed accessors.

use rush_bencode::bencode::{
    decode, decode_with_options, encode, is_canonical, validate_canonical, DecodeOptions,
    DuplicateKeyPolicy, KeyOrderPolicy, Value, ValueKind,
};
use rush_bencode::DecodeError;

fn lenient(input: &[u8]) -> Result<Value, DecodeError> {
    decode_with_options(input, DecodeOptions::lenient())
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn roundtrip_canonical_inputs() {
    let inputs: [&[u8]; 10] = [
        b"i0e",
        b"i-1e",
        b"i9223372036854775807e",
        b"0:",
        b"4:spam",
        b"le",
        b"de",
        b"li123e3:fooli456e3:baree",
        b"d3:bar4:spam3:fooi42ee",
        b"d4:infod6:lengthi5e4:name1:xe5:otherl0:i0edeee",
    ];
    for input in inputs {
        let value = decode(input).unwrap();
        assert_eq!(
            encode(&value),
            input,
            "{:?} did not re-encode byte for byte",
            String::from_utf8_lossy(input)
        );
        assert!(is_canonical(input, &value));
    }
}

#[test]
fn roundtrip_binary_payload() {
    let mut input = b"6:".to_vec();
    input.extend_from_slice(&[0x00, 0xFF, b'e', b':', 0x80, b'd']);
    let value = decode(&input).unwrap();
    assert_eq!(value.as_bytes(), Some(&input[2..]));
    assert_eq!(encode(&value), input);
}

#[test]
fn idempotence_of_encoded_values() {
    let values = vec![
        Value::Integer(i64::MIN),
        Value::bytes(Vec::<u8>::new()),
        Value::bytes(vec![0u8; 300]),
        Value::List(vec![]),
        Value::List(vec![Value::List(vec![Value::Integer(-7)]), Value::from("x")]),
        Value::dictionary([
            ("zeta", Value::Integer(1)),
            ("alpha", Value::List(vec![Value::from("a")])),
            ("", Value::dictionary::<&str, _>([])),
        ]),
    ];
    for value in values {
        let bytes = encode(&value);
        assert_eq!(decode(&bytes).unwrap(), value, "{}", value);
    }
}

#[test]
fn encoder_sorts_keys_bytewise() {
    let value = Value::dictionary([
        (&b"b"[..], Value::Integer(1)),
        (&b"a"[..], Value::Integer(2)),
        (&b"B"[..], Value::Integer(3)),
        (&b"aa"[..], Value::Integer(4)),
    ]);
    assert_eq!(encode(&value), b"d1:Bi3e1:ai2e2:aai4e1:bi1ee");
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn malformed_numbers_rejected() {
    for input in [&b"i-0e"[..], b"i01e", b"i e"] {
        assert!(
            matches!(decode(input), Err(DecodeError::MalformedNumber { .. })),
            "{:?} should be MalformedNumber",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn malformed_numbers_rejected_in_lenient_mode() {
    assert!(matches!(
        lenient(b"i-0e"),
        Err(DecodeError::MalformedNumber { offset: 1, .. })
    ));
    assert!(matches!(
        lenient(b"02:ab"),
        Err(DecodeError::MalformedNumber { offset: 0, .. })
    ));
}

#[test]
fn integer_overflow_rejected() {
    assert!(matches!(
        decode(b"i99999999999999999999e"),
        Err(DecodeError::MalformedNumber { offset: 1, .. })
    ));
}

// ============================================================================
// Truncation
// ============================================================================

#[test]
fn truncated_string_is_eof() {
    assert_eq!(
        decode(b"5:abc"),
        Err(DecodeError::UnexpectedEof { offset: 5 })
    );
}

#[test]
fn every_strict_prefix_fails() {
    let input = b"d3:bar4:spam3:fooli1ei2eee";
    for end in 0..input.len() {
        assert!(
            decode(&input[..end]).is_err(),
            "prefix of length {} decoded",
            end
        );
    }
    assert!(decode(input).is_ok());
}

#[test]
fn huge_declared_length_does_not_allocate() {
    let err = decode(b"18446744073709551615:x").unwrap_err();
    assert!(matches!(err, DecodeError::StringTooLong { offset: 0, .. }));

    let options = DecodeOptions::strict().with_max_string_length(usize::MAX);
    assert_eq!(
        decode_with_options(b"1000000:abc", options),
        Err(DecodeError::UnexpectedEof { offset: 11 })
    );
}

// ============================================================================
// Structures
// ============================================================================

#[test]
fn nested_list_structure() {
    let value = decode(b"li123e3:fooli456e3:baree").unwrap();
    assert_eq!(
        value,
        Value::List(vec![
            Value::Integer(123),
            Value::from("foo"),
            Value::List(vec![Value::Integer(456), Value::from("bar")]),
        ])
    );
}

#[test]
fn empty_containers() {
    assert_eq!(decode(b"le").unwrap(), Value::List(vec![]));
    assert_eq!(
        decode(b"de").unwrap(),
        Value::Dictionary(Default::default())
    );
}

#[test]
fn deep_nesting_is_bounded() {
    let depth = 100_000;
    let mut input = vec![b'l'; depth];
    input.extend(vec![b'e'; depth]);

    assert_eq!(
        decode(&input),
        Err(DecodeError::NestingTooDeep {
            offset: 256,
            limit: 256
        })
    );
}

#[test]
fn nesting_limit_is_configurable() {
    let input = b"llleee";
    let at_limit = DecodeOptions::strict().with_max_nesting_depth(3);
    let below = DecodeOptions::strict().with_max_nesting_depth(2);

    assert!(decode_with_options(input, at_limit).is_ok());
    assert!(matches!(
        decode_with_options(input, below),
        Err(DecodeError::NestingTooDeep { offset: 2, limit: 2 })
    ));
    // Scalars need no nesting budget
    let zero = DecodeOptions::strict().with_max_nesting_depth(0);
    assert!(decode_with_options(b"i1e", zero).is_ok());
}

// ============================================================================
// Dictionary key policies
// ============================================================================

#[test]
fn unsorted_keys_rejected_in_strict_mode() {
    assert_eq!(
        decode(b"d3:fooi1e3:bari2ee"),
        Err(DecodeError::InvalidKeyOrder { offset: 9 })
    );
}

#[test]
fn unsorted_keys_sorted_in_lenient_mode() {
    let value = lenient(b"d3:fooi1e3:bari2ee").unwrap();
    assert_eq!(
        value,
        Value::dictionary([("bar", Value::Integer(2)), ("foo", Value::Integer(1))])
    );
    assert_eq!(encode(&value), b"d3:bari2e3:fooi1ee");
}

#[test]
fn duplicate_keys() {
    let input = b"d1:ai1e1:ai2ee";
    assert!(matches!(
        decode(input),
        Err(DecodeError::DuplicateKey { offset: 7, .. })
    ));

    let value = lenient(input).unwrap();
    assert_eq!(value.get("a"), Some(&Value::Integer(2)));

    let reject = DecodeOptions::lenient().with_duplicate_keys(DuplicateKeyPolicy::Reject);
    assert!(matches!(
        decode_with_options(input, reject),
        Err(DecodeError::DuplicateKey { offset: 7, .. })
    ));
}

#[test]
fn key_order_is_checked_per_dictionary() {
    // Inner keys restart the ordering
    assert!(decode(b"d1:bd1:ai1eee").is_ok());
    assert!(decode(b"ld1:bi1eed1:ai1eee").is_ok());
}

#[test]
fn validate_canonical_ignores_lenient_policy() {
    let options = DecodeOptions::strict().with_key_order(KeyOrderPolicy::Lenient);
    assert_eq!(
        validate_canonical(b"d1:bi1e1:ai1ee", options),
        Err(DecodeError::InvalidKeyOrder { offset: 7 })
    );
    assert_eq!(validate_canonical(b"d1:ai1ee", options), Ok(()));
}

#[test]
fn non_string_key_rejected() {
    assert_eq!(
        decode(b"di1ei2ee"),
        Err(DecodeError::UnexpectedToken {
            offset: 1,
            found: b'i'
        })
    );
}

// ============================================================================
// Trailing data and framing
// ============================================================================

#[test]
fn trailing_data_rejected() {
    assert_eq!(
        decode(b"i1eX"),
        Err(DecodeError::TrailingData { offset: 3 })
    );
    assert_eq!(
        lenient(b"lei1e"),
        Err(DecodeError::TrailingData { offset: 2 })
    );
}

#[test]
fn empty_input_is_eof() {
    assert_eq!(decode(b""), Err(DecodeError::UnexpectedEof { offset: 0 }));
}

#[test]
fn input_size_limit() {
    let options = DecodeOptions::strict().with_max_input_size(4);
    assert_eq!(
        decode_with_options(b"4:spam", options),
        Err(DecodeError::InputTooLarge { size: 6, limit: 4 })
    );
}

// ============================================================================
// Accessors and errors
// ============================================================================

#[test]
fn typed_accessors() {
    let value = decode(b"d4:listli1ee3:numi7e3:str2:hie").unwrap();
    assert_eq!(value.get("num").and_then(Value::as_integer), Some(7));
    assert_eq!(value.get("str").and_then(Value::as_str), Some("hi"));
    assert_eq!(value.get("list").map(Value::kind), Some(ValueKind::List));
    assert_eq!(
        value.get("num").unwrap().try_as_bytes(),
        Err(DecodeError::TypeMismatch {
            expected: ValueKind::ByteString,
            found: ValueKind::Integer,
        })
    );
}

#[test]
fn error_codes_are_stable() {
    let cases: [(&[u8], u32, &str); 6] = [
        (b"", 100, "UnexpectedEof"),
        (b"x", 101, "UnexpectedToken"),
        (b"i01e", 102, "MalformedNumber"),
        (b"d1:bi1e1:ai1ee", 103, "InvalidKeyOrder"),
        (b"d1:ai1e1:ai1ee", 104, "DuplicateKey"),
        (b"i1ei1e", 106, "TrailingData"),
    ];
    for (input, code, name) in cases {
        let err = decode(input).unwrap_err();
        assert_eq!(err.code(), code, "{}", err);
        assert_eq!(err.name(), name);
    }
}

#[test]
fn rendering_is_diagnostic() {
    let value = decode(b"d1:ali1e2:\x00\xffee").unwrap();
    assert_eq!(value.to_string(), r#"{"a": [1, "\x00\xff"]}"#);
}

#[test]
fn decoding_is_independent_across_threads() {
    let input = b"d3:bar4:spam3:fooli1ei2eee".to_vec();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| decode(&input)))
            .collect();
        for handle in handles {
            let value = handle.join().unwrap().unwrap();
            assert_eq!(encode(&value), input);
        }
    });
}
