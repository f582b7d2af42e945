use crate::value::{TextMode, Value};
use num_traits::ToPrimitive;
use std::cmp::Ordering;

// Numeric widening: integers compare exactly against each other; any float
// operand widens both sides to f64.
fn numeric_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Uint(b)) => Some(int_uint_cmp(*a, *b)),
        (Value::Uint(a), Value::Int(b)) => Some(int_uint_cmp(*b, *a).reverse()),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&b.to_f64()?),
        (Value::Float(a), Value::Uint(b)) => a.partial_cmp(&b.to_f64()?),
        (Value::Int(a), Value::Float(b)) => a.to_f64()?.partial_cmp(b),
        (Value::Uint(a), Value::Float(b)) => a.to_f64()?.partial_cmp(b),
        _ => None,
    }
}

fn int_uint_cmp(int: i64, uint: u64) -> Ordering {
    u64::try_from(int).map_or(Ordering::Less, |int| int.cmp(&uint))
}

/// Equality with numeric widening across integer/float variants.
///
/// Mismatched non-numeric variants are unequal, never an error; lists compare
/// element-wise under the same rules.
#[must_use]
pub fn eq_coerced(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| eq_coerced(a, b))
        }
        _ if left.is_numeric() && right.is_numeric() => {
            numeric_cmp(left, right) == Some(Ordering::Equal)
        }
        _ => false,
    }
}

/// Partial ordering with numeric widening.
///
/// Returns `None` for incomparable pairs: any `Null` operand, lists, booleans
/// against non-booleans, and so on. Callers decide whether `None` is an error
/// or a negative result.
#[must_use]
pub fn order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ if left.is_numeric() && right.is_numeric() => numeric_cmp(left, right),
        _ => None,
    }
}

/// Total canonical comparator used by sort surfaces.
///
/// Ordering rules:
/// 1. Canonical variant rank
/// 2. Variant-specific comparison for same-ranked values
///
/// Mixed-rank comparisons are rank-only and must remain deterministic. `Null`
/// ranks first so absent values sort ahead of present ones ascending.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = canonical_rank(left).cmp(&canonical_rank(right));
    if rank != Ordering::Equal {
        return rank;
    }

    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::List(a), Value::List(b)) => canonical_cmp_list(a, b),
        _ => numeric_total_cmp(left, right),
    }
}

// All numeric variants share one rank so 1u64, 1i64 and 1.0 interleave.
const fn canonical_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Uint(_) | Value::Float(_) => 2,
        Value::Text(_) => 3,
        Value::List(_) => 4,
    }
}

fn canonical_cmp_list(left: &[Value], right: &[Value]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = canonical_cmp(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}

// Same-rank numeric comparison with a NaN-tolerant total fallback.
fn numeric_total_cmp(left: &Value, right: &Value) -> Ordering {
    numeric_cmp(left, right).unwrap_or_else(|| {
        let left = float_repr(left);
        let right = float_repr(right);
        left.total_cmp(&right)
    })
}

fn float_repr(value: &Value) -> f64 {
    match value {
        Value::Float(f) => *f,
        Value::Int(i) => i.to_f64().unwrap_or(f64::NAN),
        Value::Uint(u) => u.to_f64().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

// Shared body for the text predicates; `None` when either side is not text.
pub(super) fn text_op(
    haystack: &Value,
    needle: &Value,
    mode: TextMode,
    op: impl Fn(&str, &str) -> bool,
) -> Option<bool> {
    let haystack = haystack.as_text()?;
    let needle = needle.as_text()?;

    match mode {
        TextMode::Cs => Some(op(haystack, needle)),
        TextMode::Ci => Some(op(&casefold(haystack), &casefold(needle))),
    }
}

pub(crate) fn casefold(input: &str) -> String {
    if input.is_ascii() {
        return input.to_ascii_lowercase();
    }

    input.to_lowercase()
}
