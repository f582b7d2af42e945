use super::factory::*;
use super::*;

fn path(segments: &[&str]) -> PropertyPath {
    PropertyPath::new(segments.iter().copied()).unwrap()
}

fn apply_bool(expr: &Expr, row: &[Value]) -> bool {
    match expr.apply(row) {
        Ok(Value::Bool(b)) => b,
        other => panic!("expected boolean result, got {other:?}"),
    }
}

//
// structure
//

#[test]
fn paths_are_collected_in_row_order() {
    let expr = property_has_value(1i64, path(&["a"]))
        .and(properties_equal(path(&["b"]), path(&["c"])));

    let dotted: Vec<String> = expr.paths().iter().map(|p| p.dotted()).collect();
    assert_eq!(dotted, ["a", "b", "c"]);
    assert_eq!(expr.path_count(), 3);
}

#[test]
fn apply_rejects_misaligned_rows() {
    let expr = property_has_value(1i64, path(&["a"]));
    assert_eq!(
        expr.apply(&[]),
        Err(EvalError::RowWidth {
            expected: 1,
            actual: 0,
        })
    );
}

#[test]
fn rewrite_paths_visits_every_leaf() {
    let mut expr = properties_equal(path(&["a"]), path(&["b"]));
    expr.rewrite_paths(&mut |p| {
        let original = p.segments()[0].clone();
        p.set_segments(["alias".to_string(), original]).unwrap();
    });

    let dotted: Vec<String> = expr.paths().iter().map(|p| p.dotted()).collect();
    assert_eq!(dotted, ["alias.a", "alias.b"]);
}

#[test]
fn and_or_flatten_nested_connectives() {
    let expr = always_true().and(always_true()).and(always_false());
    assert!(matches!(&expr, Expr::AllTrue(children) if children.len() == 3));

    let expr = always_true().or(always_false().or(always_false()));
    assert!(matches!(&expr, Expr::AnyTrue(children) if children.len() == 3));
}

#[test]
fn variable_arity_constructors_validate() {
    assert!(matches!(
        Expr::all_true(vec![]),
        Err(EvalError::Arity {
            function: "allTrue",
            minimum: 1,
            actual: 0,
        })
    ));
    assert!(matches!(
        Expr::sum(vec![Expr::value(1i64)]),
        Err(EvalError::Arity {
            function: "sum",
            minimum: 2,
            ..
        })
    ));
}

//
// boolean connectives
//

#[test]
fn connectives_require_boolean_operands() {
    let expr = Expr::AllTrue(vec![Expr::value(1i64)]);
    assert_eq!(
        expr.apply(&[]),
        Err(EvalError::OperandType {
            function: "allTrue",
            variant: "int",
        })
    );
}

#[test]
fn not_inverts() {
    assert!(apply_bool(&not_applies(always_false()), &[]));
    assert!(!apply_bool(&!always_true(), &[]));
}

//
// equality
//

#[test]
fn all_equal_widens_numerics_and_rejects_null() {
    let eq = property_has_value(2u64, path(&["n"]));
    assert!(apply_bool(&eq, &[Value::Int(2)]));
    assert!(apply_bool(&eq, &[Value::Float(2.0)]));
    assert!(!apply_bool(&eq, &[Value::Null]));
    assert!(!apply_bool(&eq, &[Value::Text("2".into())]));
}

#[test]
fn any_equal_finds_a_matching_pair() {
    let expr = Expr::AnyEqual(vec![
        Expr::value(1i64),
        Expr::value("x"),
        Expr::value(Value::Uint(1)),
    ]);
    assert!(apply_bool(&expr, &[]));

    let expr = Expr::AnyEqual(vec![Expr::value(Value::Null), Expr::value(Value::Null)]);
    assert!(!apply_bool(&expr, &[]), "null never equals null here");
}

//
// comparisons
//

#[test]
fn comparisons_follow_strict_order() {
    assert!(apply_bool(
        &property_greater_than(10i64, path(&["n"])),
        &[Value::Int(11)]
    ));
    assert!(!apply_bool(
        &property_greater_than(10i64, path(&["n"])),
        &[Value::Int(10)]
    ));
    assert!(apply_bool(
        &property_greater_equals(10i64, path(&["n"])),
        &[Value::Uint(10)]
    ));
    assert!(apply_bool(
        &property_smaller_than(10i64, path(&["n"])),
        &[Value::Float(9.5)]
    ));
    assert!(apply_bool(
        &property_smaller_equals(10i64, path(&["n"])),
        &[Value::Int(10)]
    ));
}

#[test]
fn comparisons_with_null_are_false() {
    assert!(!apply_bool(
        &property_greater_than(10i64, path(&["n"])),
        &[Value::Null]
    ));
}

#[test]
fn comparisons_reject_mixed_types() {
    let expr = property_greater_than(10i64, path(&["n"]));
    assert_eq!(
        expr.apply(&[Value::Text("11".into())]),
        Err(EvalError::OperandType {
            function: "greater",
            variant: "text",
        })
    );
}

#[test]
fn between_is_inclusive_and_null_safe() {
    let expr = property_between_inclusive(1i64, 5i64, path(&["n"]));
    assert!(apply_bool(&expr, &[Value::Int(3)]));
    assert!(apply_bool(&expr, &[Value::Int(1)]));
    assert!(apply_bool(&expr, &[Value::Int(5)]));
    assert!(!apply_bool(&expr, &[Value::Int(6)]));
    assert!(!apply_bool(&expr, &[Value::Null]));
}

//
// membership
//

#[test]
fn one_of_matches_against_literal_list() {
    let expr = property_has_any_of_values(vec![1i64, 2, 3], path(&["n"]));
    assert!(apply_bool(&expr, &[Value::Uint(2)]));
    assert!(!apply_bool(&expr, &[Value::Int(4)]));
    assert!(!apply_bool(&expr, &[Value::Null]));
}

#[test]
fn one_of_with_empty_list_matches_nothing() {
    let expr = property_has_any_of_values(Vec::<i64>::new(), path(&["n"]));
    assert!(!apply_bool(&expr, &[Value::Int(1)]));
}

#[test]
fn member_of_checks_packed_collections() {
    let expr = property_has_string_as_member("scifi", path(&["tags"])).unwrap();
    let tags = Value::from_slice(&["classic", "scifi"]);
    assert!(apply_bool(&expr, &[tags]));
    assert!(!apply_bool(&expr, &[Value::from_slice(&["classic"])]));
    assert!(!apply_bool(&expr, &[Value::Null]));
}

#[test]
fn member_of_rejects_scalar_haystack() {
    let expr = property_has_string_as_member("x", path(&["tags"])).unwrap();
    assert_eq!(
        expr.apply(&[Value::Text("x".into())]),
        Err(EvalError::OperandType {
            function: "memberOf",
            variant: "text",
        })
    );
}

//
// arithmetic
//

#[test]
fn sum_and_product_stay_exact_for_integers() {
    let sum = Expr::sum(vec![Expr::value(1i64), Expr::value(Value::Uint(2))]).unwrap();
    assert_eq!(sum.apply(&[]), Ok(Value::Int(3)));

    let product = Expr::product(vec![Expr::value(3i64), Expr::value(4i64)]).unwrap();
    assert_eq!(product.apply(&[]), Ok(Value::Int(12)));
}

#[test]
fn arithmetic_widens_to_float_when_any_operand_is_float() {
    let sum = Expr::sum(vec![Expr::value(1i64), Expr::value(0.5f64)]).unwrap();
    assert_eq!(sum.apply(&[]), Ok(Value::Float(1.5)));
}

#[test]
fn arithmetic_overflow_is_loud() {
    let product = Expr::product(vec![
        Expr::value(Value::Uint(u64::MAX)),
        Expr::value(Value::Uint(u64::MAX)),
    ])
    .unwrap();
    assert_eq!(
        product.apply(&[]),
        Err(EvalError::NumericOverflow {
            function: "product"
        })
    );
}

#[test]
fn arithmetic_rejects_non_numeric_operands() {
    let sum = Expr::sum(vec![Expr::value(1i64), Expr::value("x")]).unwrap();
    assert_eq!(
        sum.apply(&[]),
        Err(EvalError::OperandType {
            function: "sum",
            variant: "text",
        })
    );
}

//
// text
//

#[test]
fn string_predicates_ignore_case() {
    let contains = property_contains_string_ci("ada", path(&["name"]));
    assert!(apply_bool(&contains, &[Value::Text("Ada Lovelace".into())]));

    let starts = property_starts_with_ci("ADA", path(&["name"]));
    assert!(apply_bool(&starts, &[Value::Text("ada lovelace".into())]));

    let ends = property_ends_with_ci("LACE", path(&["name"]));
    assert!(apply_bool(&ends, &[Value::Text("Ada Lovelace".into())]));
}

#[test]
fn string_predicates_with_empty_needle_are_true() {
    let contains = property_contains_string_ci("", path(&["name"]));
    assert!(apply_bool(&contains, &[Value::Text("anything".into())]));
}

#[test]
fn string_predicates_with_null_are_false() {
    let contains = property_contains_string_ci("x", path(&["name"]));
    assert!(!apply_bool(&contains, &[Value::Null]));
}

#[test]
fn lower_upper_pass_null_through() {
    let lower = Expr::Lower(Box::new(Expr::value("MiXeD")));
    assert_eq!(lower.apply(&[]), Ok(Value::Text("mixed".into())));

    let upper = Expr::Upper(Box::new(Expr::value(1i64)));
    assert_eq!(upper.apply(&[]), Ok(Value::Null));
}

//
// null and size
//

#[test]
fn is_null_checks() {
    assert!(apply_bool(&property_is_null(path(&["p"])), &[Value::Null]));
    assert!(!apply_bool(
        &property_is_null(path(&["p"])),
        &[Value::Int(0)]
    ));
    assert!(apply_bool(
        &property_is_not_null(path(&["p"])),
        &[Value::Int(0)]
    ));
}

#[test]
fn size_counts_list_elements() {
    let expr = property_has_size(2, path(&["tags"])).unwrap();
    assert!(apply_bool(&expr, &[Value::from_slice(&["a", "b"])]));
    assert!(!apply_bool(&expr, &[Value::from_slice(&["a"])]));
}

#[test]
fn size_rejects_non_lists() {
    let expr = Expr::Size(Box::new(Expr::value("abc")));
    assert_eq!(
        expr.apply(&[]),
        Err(EvalError::OperandType {
            function: "size",
            variant: "text",
        })
    );
}

//
// salted member-list conjunction
//

#[test]
fn all_values_present_uses_one_salted_path_per_value() {
    let expr = all_values_present_in_member_list_properties(
        vec!["A", "B"],
        path(&["books", "title"]),
    );

    let paths = expr.paths();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0].salt(), "0");
    assert_eq!(paths[1].salt(), "1");
    assert_ne!(paths[0], paths[1]);

    // the row pairing both titles satisfies the conjunction
    assert!(apply_bool(
        &expr,
        &[Value::Text("A".into()), Value::Text("B".into())]
    ));
    assert!(!apply_bool(
        &expr,
        &[Value::Text("A".into()), Value::Text("A".into())]
    ));
}

#[test]
fn all_values_present_with_no_values_is_vacuously_true() {
    let expr =
        all_values_present_in_member_list_properties(Vec::<String>::new(), path(&["tags"]));
    assert!(apply_bool(&expr, &[]));
}
