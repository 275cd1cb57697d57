use super::*;
use bytes::{Bytes, BytesMut};
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};

mod property;

fn round_trip<T>(registry: &TypeRegistry, values: Vec<T>)
where
    T: ArrayElement + PartialEq + std::fmt::Debug,
{
    for codec in [RegistryCodec::text(registry), RegistryCodec::binary(registry)] {
        let wire = codec.encode(values.as_slice()).unwrap();
        let back: Vec<T> = codec.decode(&wire).unwrap();
        assert_eq!(back, values, "format {:?}", codec.format());
    }
}

#[test]
fn non_empty_sequences_round_trip() {
    let registry = TypeRegistry::standard();
    round_trip(&registry, vec![1_i16, -2, i16::MAX]);
    round_trip(&registry, vec![0_i32, 42, i32::MIN]);
    round_trip(&registry, vec![i64::MAX, 7]);
    round_trip(&registry, vec![1.25_f32, -0.5]);
    round_trip(&registry, vec![3.5_f64, f64::INFINITY, 1e-9]);
    round_trip(&registry, vec![true, false, true]);
    round_trip(
        &registry,
        vec![
            "red".to_owned(),
            "two words".to_owned(),
            String::new(),
            "NULL".to_owned(),
            "quote\"and\\slash".to_owned(),
            "{braces},comma".to_owned(),
        ],
    );
}

#[test]
fn empty_sequence_encodes_as_null_and_decodes_as_empty() {
    let registry = TypeRegistry::standard();
    for codec in [RegistryCodec::text(&registry), RegistryCodec::binary(&registry)] {
        let wire = ArrayCodec::<i32>::encode(&codec, &[]).unwrap();
        assert_eq!(wire, WireValue::Null);
        assert!(wire.is_null());

        let back: Vec<i32> = codec.decode(&wire).unwrap();
        assert!(back.is_empty());
    }
}

#[test]
fn encoded_values_carry_the_array_type() {
    let registry = TypeRegistry::standard();

    let wire = RegistryCodec::text(&registry)
        .encode(&["Jane".to_owned(), "John".to_owned()][..])
        .unwrap();
    assert_eq!(
        wire,
        WireValue::Text {
            array_type: Type::TEXT_ARRAY,
            literal: "{Jane,John}".to_owned(),
        }
    );

    let wire = RegistryCodec::binary(&registry).encode(&[5_i64][..]).unwrap();
    assert_eq!(wire.array_type(), Some(&Type::INT8_ARRAY));
}

#[test]
fn unregistered_type_fails_both_ways() {
    let registry = TypeRegistry::builder()
        .register::<i32>(Type::INT4, Type::INT4_ARRAY)
        .build();
    let codec = RegistryCodec::binary(&registry);

    let err = ArrayCodec::<i64>::encode(&codec, &[1]).unwrap_err();
    assert!(matches!(err, EncodeError::UnsupportedType("i64")));

    // Even an empty sequence needs a known element type.
    let err = ArrayCodec::<i64>::encode(&codec, &[]).unwrap_err();
    assert!(matches!(err, EncodeError::UnsupportedType(_)));

    let err = ArrayCodec::<i64>::decode(&codec, &WireValue::Null).unwrap_err();
    assert!(matches!(err, DecodeError::UnregisteredType("i64")));
}

#[test]
fn decoding_into_the_wrong_element_type_fails() {
    let registry = TypeRegistry::standard();
    let codec = RegistryCodec::binary(&registry);

    let wire = codec.encode(&[1_i32, 2][..]).unwrap();
    let err = ArrayCodec::<i64>::decode(&codec, &wire).unwrap_err();
    assert!(matches!(err, DecodeError::ElementTypeMismatch { rust_type: "i64", .. }));

    let text = WireValue::Text {
        array_type: Type::TEXT_ARRAY,
        literal: "{1,2}".to_owned(),
    };
    let err = ArrayCodec::<i32>::decode(&codec, &text).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::ElementTypeMismatch { found, .. } if found == Type::TEXT.oid()
    ));
}

#[test]
fn text_decode_reports_bad_elements() {
    let registry = TypeRegistry::standard();
    let codec = RegistryCodec::text(&registry);

    let wire = WireValue::Text {
        array_type: Type::INT4_ARRAY,
        literal: "{1,NULL,3}".to_owned(),
    };
    let err = ArrayCodec::<i32>::decode(&codec, &wire).unwrap_err();
    assert!(matches!(err, DecodeError::NullElement(1)));

    let wire = WireValue::Text {
        array_type: Type::INT4_ARRAY,
        literal: "{1,two}".to_owned(),
    };
    let err = ArrayCodec::<i32>::decode(&codec, &wire).unwrap_err();
    assert!(matches!(err, DecodeError::Element { index: 1, .. }));

    let wire = WireValue::Text {
        array_type: Type::INT4,
        literal: "{1}".to_owned(),
    };
    let err = ArrayCodec::<i32>::decode(&codec, &wire).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed(_)));
}

#[test]
fn decodes_empty_literal_and_empty_binary_array() {
    let registry = TypeRegistry::standard();
    let codec = RegistryCodec::binary(&registry);

    let text = WireValue::Text {
        array_type: Type::INT4_ARRAY,
        literal: "{}".to_owned(),
    };
    assert!(ArrayCodec::<i32>::decode(&codec, &text).unwrap().is_empty());

    let mut buf = BytesMut::new();
    binary::encode_array::<i32>(&Type::INT4, &[], &mut buf).unwrap();
    let bin = WireValue::Binary {
        array_type: Type::INT4_ARRAY,
        bytes: buf.freeze(),
    };
    assert!(ArrayCodec::<i32>::decode(&codec, &bin).unwrap().is_empty());
}

#[test]
fn garbage_binary_is_malformed() {
    let registry = TypeRegistry::standard();
    let codec = RegistryCodec::binary(&registry);
    let wire = WireValue::Binary {
        array_type: Type::INT4_ARRAY,
        bytes: Bytes::from_static(&[0, 0, 1]),
    };
    let err = ArrayCodec::<i32>::decode(&codec, &wire).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed(_)));
}

#[test]
fn pg_array_binds_empty_as_null() {
    let mut buf = BytesMut::new();
    let empty = PgArray::<i32>::default();
    let is_null = empty.to_sql(&Type::INT4_ARRAY, &mut buf).unwrap();
    assert!(matches!(is_null, IsNull::Yes));
    assert!(buf.is_empty());
}

#[test]
fn pg_array_round_trips_through_tokio_postgres_traits() {
    let numbers = PgArray::new(vec![3_i32, 1, 4, 1, 5]);
    let mut buf = BytesMut::new();
    let is_null = numbers
        .to_sql_checked(&Type::INT4_ARRAY, &mut buf)
        .unwrap();
    assert!(matches!(is_null, IsNull::No));

    let back = PgArray::<i32>::from_sql(&Type::INT4_ARRAY, &buf).unwrap();
    assert_eq!(back, numbers);

    // Same bytes as the native `Vec<i32>` encoding.
    let native = Vec::<i32>::from_sql(&Type::INT4_ARRAY, &buf).unwrap();
    assert_eq!(native, numbers.into_inner());
}

#[test]
fn pg_array_scans_null_as_empty() {
    let scanned = PgArray::<i32>::from_sql_null(&Type::INT4_ARRAY).unwrap();
    assert!(scanned.is_empty());

    let scanned = PgArray::<i32>::from_sql_nullable(&Type::INT4_ARRAY, None).unwrap();
    assert_eq!(scanned, PgArray::default());
}

#[test]
fn pg_array_accepts_only_matching_arrays() {
    assert!(<PgArray<i32> as FromSql>::accepts(&Type::INT4_ARRAY));
    assert!(!<PgArray<i32> as FromSql>::accepts(&Type::INT4));
    assert!(!<PgArray<i32> as FromSql>::accepts(&Type::TEXT_ARRAY));
    assert!(<PgArray<String> as ToSql>::accepts(&Type::VARCHAR_ARRAY));

    let mut buf = BytesMut::new();
    assert!(
        PgArray::new(vec![1_i32])
            .to_sql_checked(&Type::TEXT_ARRAY, &mut buf)
            .is_err()
    );
}

#[test]
fn pg_array_displays_like_a_list() {
    assert_eq!(PgArray::new(vec![1, 2, 3]).to_string(), "[1 2 3]");
    assert_eq!(PgArray::<i32>::default().to_string(), "[]");
}

#[test]
fn text_decode_keeps_non_breaking_spaces() {
    let registry = TypeRegistry::standard();
    let wire = WireValue::Text {
        array_type: Type::TEXT_ARRAY,
        literal: "{\u{a0}x,y\u{a0}}".to_owned(),
    };
    let back: Vec<String> = RegistryCodec::text(&registry).decode(&wire).unwrap();
    assert_eq!(back, ["\u{a0}x", "y\u{a0}"]);
}
