use super::*;
use crate::array::TypeRegistry;
use crate::query::max_placeholder;
use bytes::BytesMut;
use tokio_postgres::types::{IsNull, Kind, ToSql, Type};


fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn placeholder_numbers(conditions: &[String]) -> Vec<usize> {
    conditions.iter().map(|c| max_placeholder(c)).collect()
}

#[test]
fn full_filter_scenario() {
    let filter = AccountFilter::new()
        .names(["Jane", "John"])
        .active(true)
        .fav_colors(["red", "blue", "green"]);

    let result = build(&filter);
    assert_eq!(
        result.conditions(),
        ["name = ANY($1)", "active = $2", "fav_color = ANY($3)"]
    );
    assert_eq!(
        result.arguments(),
        [
            Argument::TextArray(strings(&["Jane", "John"])),
            Argument::Bool(true),
            Argument::TextArray(strings(&["red", "blue", "green"])),
        ]
    );
}

#[test]
fn empty_filter_scenario() {
    let filter = AccountFilter {
        names: vec![],
        active: None,
        fav_colors: vec![],
    };
    assert!(filter.is_empty());

    let result = build(&filter);
    assert!(result.is_empty());
    assert!(result.conditions().is_empty());
    assert!(result.arguments().is_empty());
    assert_eq!(result.where_clause(), None);
}

#[test]
fn false_is_present_not_absent() {
    let filter = AccountFilter::new().active(false);
    assert!(!filter.is_empty());

    let result = build(&filter);
    assert_eq!(result.conditions(), ["active = $1"]);
    assert_eq!(result.arguments(), [Argument::Bool(false)]);
}

#[test]
fn names_are_one_argument_not_flattened() {
    let result = build(&AccountFilter::new().names(["a", "b", "c", "d"]));
    assert_eq!(result.conditions(), ["name = ANY($1)"]);
    assert_eq!(result.arguments().len(), 1);
    assert_eq!(
        result.arguments()[0],
        Argument::TextArray(strings(&["a", "b", "c", "d"]))
    );
}

#[test]
fn every_combination_keeps_order_and_numbering() {
    for mask in 0..8u8 {
        let mut filter = AccountFilter::new();
        let mut expected_columns = Vec::new();
        if mask & 1 != 0 {
            filter = filter.names(["Jane"]);
            expected_columns.push("name");
        }
        if mask & 2 != 0 {
            filter = filter.active(mask & 4 == 0);
            expected_columns.push("active");
        }
        if mask & 4 != 0 {
            filter = filter.fav_colors(["red"]);
            expected_columns.push("fav_color");
        }

        let result = build(&filter);
        assert_eq!(result.conditions().len(), result.arguments().len(), "mask {mask}");
        assert_eq!(result.len(), expected_columns.len(), "mask {mask}");

        let columns: Vec<&str> = result
            .conditions()
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default())
            .collect();
        assert_eq!(columns, expected_columns, "mask {mask}");

        let expected_numbers: Vec<usize> = (1..=expected_columns.len()).collect();
        assert_eq!(placeholder_numbers(result.conditions()), expected_numbers, "mask {mask}");

        // Every placeholder in the joined text has an argument.
        let joined = result.where_clause().unwrap_or_default();
        assert_eq!(max_placeholder(&joined), result.arguments().len(), "mask {mask}");
    }
}

#[test]
fn builder_skips_empty_inputs() {
    let mut builder = PredicateBuilder::new();
    builder
        .any("name", &[])
        .eq::<bool>("active", None)
        .eq("id", Some(7_i64))
        .any("fav_color", &strings(&["green"]));
    let result = builder.finish();

    assert_eq!(result.conditions(), ["id = $1", "fav_color = ANY($2)"]);
    assert_eq!(
        result.into_parts().1,
        vec![Argument::Int8(7), Argument::TextArray(strings(&["green"]))]
    );
}

#[test]
fn compose_adds_where_only_when_needed() {
    let base = "SELECT id FROM accounts";

    let q = build(&AccountFilter::new()).compose(base);
    assert_eq!(q.sql(), base);
    assert_eq!(q.param_count(), 0);
    assert!(q.validate().is_ok());

    let q = build(&AccountFilter::new().names(["Jane", "John"]).active(true)).compose(base);
    assert_eq!(
        q.sql(),
        "SELECT id FROM accounts WHERE name = ANY($1) AND active = $2"
    );
    assert_eq!(q.param_count(), 2);
    assert!(q.validate().is_ok());
}

#[test]
fn arguments_render_their_text_form() {
    let registry = TypeRegistry::standard();
    let names = Argument::TextArray(strings(&["Jane", "Mary Ann"]));
    assert_eq!(names.to_literal(&registry).unwrap(), r#"{Jane,"Mary Ann"}"#);
    assert_eq!(Argument::Bool(false).to_literal(&registry).unwrap(), "false");
    assert_eq!(Argument::TextArray(vec![]).to_literal(&registry).unwrap(), "NULL");
    assert_eq!(
        Argument::from("O'Brien").to_literal(&registry).unwrap(),
        "O'Brien"
    );
    assert_eq!(names.to_string(), "[Jane Mary Ann]");
}

#[test]
fn text_array_binds_to_enum_arrays() {
    let colors = Type::new(
        "colors".to_string(),
        90_001,
        Kind::Enum(strings(&["red", "green", "blue"])),
        "public".to_string(),
    );
    let colors_array = Type::new(
        "_colors".to_string(),
        90_002,
        Kind::Array(colors.clone()),
        "public".to_string(),
    );

    let argument = Argument::TextArray(strings(&["red", "blue"]));
    let mut buf = BytesMut::new();
    let is_null = argument.to_sql_checked(&colors_array, &mut buf).unwrap();
    assert!(matches!(is_null, IsNull::No));

    // Header names the enum element OID; elements are the raw labels.
    assert_eq!(&buf[8..12], &90_001_u32.to_be_bytes());
    assert_eq!(&buf[buf.len() - 4..], b"blue");

    // Same bytes as a native text[] for the text element type.
    let mut text_buf = BytesMut::new();
    argument.to_sql_checked(&Type::TEXT_ARRAY, &mut text_buf).unwrap();
    let mut native = BytesMut::new();
    strings(&["red", "blue"])
        .to_sql_checked(&Type::TEXT_ARRAY, &mut native)
        .unwrap();
    assert_eq!(text_buf, native);
}

#[test]
fn mismatched_argument_types_are_rejected() {
    let mut buf = BytesMut::new();
    assert!(Argument::Bool(true).to_sql_checked(&Type::TEXT, &mut buf).is_err());
    assert!(
        Argument::TextArray(strings(&["x"]))
            .to_sql_checked(&Type::INT4_ARRAY, &mut buf)
            .is_err()
    );
    assert!(Argument::Int8(1).to_sql_checked(&Type::INT8, &mut buf).is_ok());
}
