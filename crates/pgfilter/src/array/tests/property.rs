use crate::array::{ArrayCodec, ArrayElement, RegistryCodec, TypeRegistry, WireFormat, WireValue};
use proptest::prelude::*;
use std::fmt::Debug;
use tokio_postgres::types::Type;

fn round_trips<T>(values: &[T], format: WireFormat) -> Result<(), TestCaseError>
where
    T: ArrayElement + PartialEq + Debug,
{
    let registry = TypeRegistry::standard();
    let codec = RegistryCodec::new(&registry, format);
    let wire = codec.encode(values).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert!(!wire.is_null());

    let back: Vec<T> = codec
        .decode(&wire)
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(back.as_slice(), values);
    Ok(())
}

fn arb_format() -> impl Strategy<Value = WireFormat> {
    prop_oneof![Just(WireFormat::Text), Just(WireFormat::Binary)]
}

fn non_empty<T: Strategy>(element: T) -> impl Strategy<Value = Vec<T::Value>> {
    prop::collection::vec(element, 1..8)
}

fn arb_f32() -> impl Strategy<Value = f32> {
    any::<f32>().prop_filter("NaN never compares equal", |f| !f.is_nan())
}

fn arb_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("NaN never compares equal", |f| !f.is_nan())
}

/// Strings weighted towards the characters array literals treat specially.
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        r#"[ \t\n\r\x0b\x0c{},"\\a-zA-Z\u{a0}\u{2003}]{0,12}"#,
        prop_oneof![Just("NULL"), Just("null"), Just(""), Just(" NULL ")].prop_map(String::from),
    ]
}

proptest! {
    #[test]
    fn i16_sequences_round_trip(values in non_empty(any::<i16>()), format in arb_format()) {
        round_trips(&values, format)?;
    }

    #[test]
    fn i32_sequences_round_trip(values in non_empty(any::<i32>()), format in arb_format()) {
        round_trips(&values, format)?;
    }

    #[test]
    fn i64_sequences_round_trip(values in non_empty(any::<i64>()), format in arb_format()) {
        round_trips(&values, format)?;
    }

    #[test]
    fn f32_sequences_round_trip(values in non_empty(arb_f32()), format in arb_format()) {
        round_trips(&values, format)?;
    }

    #[test]
    fn f64_sequences_round_trip(values in non_empty(arb_f64()), format in arb_format()) {
        round_trips(&values, format)?;
    }

    #[test]
    fn bool_sequences_round_trip(values in non_empty(any::<bool>()), format in arb_format()) {
        round_trips(&values, format)?;
    }

    #[test]
    fn string_sequences_round_trip(values in non_empty(arb_text()), format in arb_format()) {
        round_trips(&values, format)?;
    }

    #[test]
    fn text_literals_keep_non_ascii_whitespace(
        head in "[\u{a0}\u{2003}\u{3000}]{1,3}",
        tail in "[\u{a0}\u{2003}\u{3000}]{1,3}",
    ) {
        let registry = TypeRegistry::standard();
        let codec = RegistryCodec::text(&registry);
        let wire = WireValue::Text {
            array_type: Type::TEXT_ARRAY,
            literal: format!("{{{head}x,y{tail}}}"),
        };
        let back: Vec<String> = codec
            .decode(&wire)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(back, vec![format!("{head}x"), format!("y{tail}")]);
    }
}
