use super::*;
use std::cmp::Ordering;

#[test]
fn eq_coerced_widens_across_numeric_variants() {
    assert!(Value::Int(1).eq_coerced(&Value::Uint(1)));
    assert!(Value::Uint(2).eq_coerced(&Value::Float(2.0)));
    assert!(Value::Int(-3).eq_coerced(&Value::Float(-3.0)));
    assert!(!Value::Int(-1).eq_coerced(&Value::Uint(u64::MAX)));
}

#[test]
fn eq_coerced_rejects_cross_variant_non_numeric() {
    assert!(!Value::Text("1".into()).eq_coerced(&Value::Int(1)));
    assert!(!Value::Bool(true).eq_coerced(&Value::Int(1)));
    assert!(!Value::Null.eq_coerced(&Value::Int(0)));
    assert!(Value::Null.eq_coerced(&Value::Null));
}

#[test]
fn eq_coerced_compares_lists_element_wise() {
    let a = Value::from_slice(&[1i64, 2, 3]);
    let b = Value::List(vec![Value::Uint(1), Value::Uint(2), Value::Uint(3)]);
    assert!(a.eq_coerced(&b));

    let shorter = Value::from_slice(&[1i64, 2]);
    assert!(!a.eq_coerced(&shorter));
}

#[test]
fn order_cmp_is_none_for_incomparable_pairs() {
    assert_eq!(Value::Null.order_cmp(&Value::Int(1)), None);
    assert_eq!(Value::Text("a".into()).order_cmp(&Value::Int(1)), None);
    assert_eq!(
        Value::List(vec![]).order_cmp(&Value::List(vec![])),
        None,
        "lists have no partial order"
    );
}

#[test]
fn order_cmp_widens_numerics() {
    assert_eq!(
        Value::Int(1).order_cmp(&Value::Float(1.5)),
        Some(Ordering::Less)
    );
    assert_eq!(
        Value::Uint(3).order_cmp(&Value::Int(-7)),
        Some(Ordering::Greater)
    );
}

#[test]
fn order_cmp_rejects_nan() {
    assert_eq!(Value::Float(f64::NAN).order_cmp(&Value::Float(1.0)), None);
}

#[test]
fn canonical_cmp_is_total_and_ranks_null_first() {
    let mut values = vec![
        Value::Text("b".into()),
        Value::Int(2),
        Value::Null,
        Value::Bool(true),
        Value::Float(1.5),
    ];
    values.sort_by(Value::canonical_cmp);

    assert_eq!(values[0], Value::Null);
    assert_eq!(values[1], Value::Bool(true));
    assert_eq!(values[2], Value::Float(1.5));
    assert_eq!(values[3], Value::Int(2));
    assert_eq!(values[4], Value::Text("b".into()));
}

#[test]
fn text_ops_honor_case_mode() {
    let hay = Value::Text("Hello World".into());
    let needle = Value::Text("hello".into());

    assert_eq!(hay.text_contains(&needle, TextMode::Cs), Some(false));
    assert_eq!(hay.text_contains(&needle, TextMode::Ci), Some(true));
    assert_eq!(hay.text_starts_with(&needle, TextMode::Ci), Some(true));
    assert_eq!(hay.text_ends_with(&needle, TextMode::Ci), Some(false));
}

#[test]
fn text_ops_are_none_for_non_text() {
    assert_eq!(
        Value::Int(1).text_contains(&Value::Text("1".into()), TextMode::Ci),
        None
    );
    assert_eq!(
        Value::Text("a".into()).text_contains(&Value::Null, TextMode::Ci),
        None
    );
}

#[test]
fn into_value_conversions() {
    assert_eq!(1i32.into_value(), Value::Int(1));
    assert_eq!(1u32.into_value(), Value::Uint(1));
    assert_eq!("x".into_value(), Value::Text("x".into()));
    assert_eq!(None::<i64>.into_value(), Value::Null);
    assert_eq!(
        vec![1i64, 2].into_value(),
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
}
