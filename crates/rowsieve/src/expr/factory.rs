//! Condition factories.
//!
//! Thin constructors that pair property paths with constants into the
//! expression shapes the evaluator and renderer understand. Factories taking
//! a variable number of conditions validate arity and return `Result`; the
//! fixed-shape ones cannot fail.

use crate::{
    expr::{EvalError, Expr},
    path::PropertyPath,
    value::{IntoValue, Value},
};

/// Condition that matches every entity.
#[must_use]
pub fn always_true() -> Expr {
    Expr::Value(Value::Bool(true))
}

/// Condition that matches no entity.
#[must_use]
pub fn always_false() -> Expr {
    Expr::Value(Value::Bool(false))
}

/// Conjunction of one or more conditions.
pub fn all_apply(conditions: Vec<Expr>) -> Result<Expr, EvalError> {
    Expr::all_true(conditions)
}

/// Disjunction of one or more conditions.
pub fn any_applies(conditions: Vec<Expr>) -> Result<Expr, EvalError> {
    Expr::any_true(conditions)
}

/// Negation of a condition.
#[must_use]
pub fn not_applies(condition: Expr) -> Expr {
    condition.negate()
}

/// The property equals the given non-null value.
///
/// Equality against null is always false here; use [`property_is_null`] for
/// null checks.
#[must_use]
pub fn property_has_value(value: impl IntoValue, path: PropertyPath) -> Expr {
    Expr::AllEqual(vec![Expr::property(path), Expr::value(value)])
}

/// The property does not equal the given value.
#[must_use]
pub fn property_has_not_value(value: impl IntoValue, path: PropertyPath) -> Expr {
    property_has_value(value, path).negate()
}

/// Two properties resolve to equal non-null values.
#[must_use]
pub fn properties_equal(left: PropertyPath, right: PropertyPath) -> Expr {
    Expr::AllEqual(vec![Expr::property(left), Expr::property(right)])
}

/// The property equals one of the given values. An empty list matches
/// nothing.
#[must_use]
pub fn property_has_any_of_values<V: IntoValue>(values: Vec<V>, path: PropertyPath) -> Expr {
    Expr::OneOf {
        haystack: Box::new(Expr::value(Value::from_list(values))),
        needle: Box::new(Expr::property(path)),
    }
}

/// The collection-valued property contains the given string.
///
/// The path is read at access depth zero so the terminal collection resolves
/// as one packed list instead of fanning out.
pub fn property_has_string_as_member(
    value: impl Into<String>,
    path: PropertyPath,
) -> Result<Expr, crate::path::PathError> {
    Ok(Expr::MemberOf {
        needle: Box::new(Expr::value(Value::Text(value.into()))),
        haystack: Box::new(Expr::property(path.with_access_depth(0)?)),
    })
}

/// Every given value is present among the values the property fans out to.
///
/// Each value gets its own salted copy of the path, so the join keeps one
/// column per value and the cross product contains a row pairing any
/// combination of them. An empty value list is vacuously true.
#[must_use]
pub fn all_values_present_in_member_list_properties<V: IntoValue>(
    values: Vec<V>,
    path: PropertyPath,
) -> Expr {
    if values.is_empty() {
        return always_true();
    }

    let checks = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let salted = path.clone().with_salt(index.to_string());
            Expr::AllEqual(vec![Expr::property(salted), Expr::value(value)])
        })
        .collect();

    Expr::AllTrue(checks)
}

/// The property resolves to null (or to nothing at all).
#[must_use]
pub fn property_is_null(path: PropertyPath) -> Expr {
    Expr::IsNull(Box::new(Expr::property(path)))
}

/// The property resolves to a non-null value.
#[must_use]
pub fn property_is_not_null(path: PropertyPath) -> Expr {
    property_is_null(path).negate()
}

/// The property lies in the inclusive range `[min, max]`.
#[must_use]
pub fn property_between_inclusive(
    min: impl IntoValue,
    max: impl IntoValue,
    path: PropertyPath,
) -> Expr {
    Expr::Between {
        min: Box::new(Expr::value(min)),
        max: Box::new(Expr::value(max)),
        value: Box::new(Expr::property(path)),
    }
}

/// Case-insensitive substring match on a text property.
#[must_use]
pub fn property_contains_string_ci(needle: impl Into<String>, path: PropertyPath) -> Expr {
    Expr::StringContains {
        haystack: Box::new(Expr::property(path)),
        needle: Box::new(Expr::value(Value::Text(needle.into()))),
    }
}

/// Case-insensitive prefix match on a text property.
#[must_use]
pub fn property_starts_with_ci(prefix: impl Into<String>, path: PropertyPath) -> Expr {
    Expr::StartsWith {
        haystack: Box::new(Expr::property(path)),
        needle: Box::new(Expr::value(Value::Text(prefix.into()))),
    }
}

/// Case-insensitive suffix match on a text property.
#[must_use]
pub fn property_ends_with_ci(suffix: impl Into<String>, path: PropertyPath) -> Expr {
    Expr::EndsWith {
        haystack: Box::new(Expr::property(path)),
        needle: Box::new(Expr::value(Value::Text(suffix.into()))),
    }
}

/// The property is strictly greater than the given value.
#[must_use]
pub fn property_greater_than(value: impl IntoValue, path: PropertyPath) -> Expr {
    Expr::Greater(Box::new(Expr::property(path)), Box::new(Expr::value(value)))
}

/// The property is greater than or equal to the given value.
#[must_use]
pub fn property_greater_equals(value: impl IntoValue, path: PropertyPath) -> Expr {
    Expr::GreaterEquals(Box::new(Expr::property(path)), Box::new(Expr::value(value)))
}

/// The property is strictly smaller than the given value.
#[must_use]
pub fn property_smaller_than(value: impl IntoValue, path: PropertyPath) -> Expr {
    Expr::Smaller(Box::new(Expr::property(path)), Box::new(Expr::value(value)))
}

/// The property is smaller than or equal to the given value.
#[must_use]
pub fn property_smaller_equals(value: impl IntoValue, path: PropertyPath) -> Expr {
    Expr::SmallerEquals(Box::new(Expr::property(path)), Box::new(Expr::value(value)))
}

/// The collection-valued property holds exactly `size` elements.
///
/// Reads the path at access depth zero so the collection arrives packed.
pub fn property_has_size(size: u64, path: PropertyPath) -> Result<Expr, crate::path::PathError> {
    Ok(Expr::AllEqual(vec![
        Expr::Size(Box::new(Expr::property(path.with_access_depth(0)?))),
        Expr::value(Value::Uint(size)),
    ]))
}
