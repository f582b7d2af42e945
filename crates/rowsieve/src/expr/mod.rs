pub mod factory;

#[cfg(test)]
mod tests;

use crate::{
    path::PropertyPath,
    value::{IntoValue, TextMode, Value},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr, Not};
use thiserror::Error as ThisError;

///
/// EvalError
///
/// Typed failures raised while applying an expression to a value row.
/// Type mismatches never coerce silently; the null-to-false rules of the
/// individual operators are part of the contract, everything else errors.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EvalError {
    #[error("`{function}` requires at least {minimum} operands, got {actual}")]
    Arity {
        function: &'static str,
        minimum: usize,
        actual: usize,
    },

    #[error("`{function}` cannot operate on a {variant} operand")]
    OperandType {
        function: &'static str,
        variant: &'static str,
    },

    #[error("expression expects a row of {expected} values, got {actual}")]
    RowWidth { expected: usize, actual: usize },

    #[error("numeric overflow in `{function}`")]
    NumericOverflow { function: &'static str },
}

///
/// Expr
///
/// One closed expression tree shared by the in-memory evaluator and the SQL
/// renderer. Leaves are constants (`Value`) or property references
/// (`Property`); composites combine the results of their children.
///
/// A node's declared property paths are the in-order concatenation of its
/// children's paths; `apply` consumes a row positionally aligned to that
/// list. Both interpreters slice the row/alias list with the same helper so
/// they cannot drift apart structurally.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Expr {
    /// Constant leaf; declares no property paths.
    Value(Value),
    /// Property reference leaf; consumes exactly one row position.
    Property(PropertyPath),

    /// Boolean conjunction over one or more children.
    AllTrue(Vec<Self>),
    /// Boolean disjunction over one or more children.
    AnyTrue(Vec<Self>),
    /// Boolean negation.
    Not(Box<Self>),

    /// True iff every child yields the same non-null value (two or more).
    AllEqual(Vec<Self>),
    /// True iff some pair of children yields equal non-null values.
    AnyEqual(Vec<Self>),

    Greater(Box<Self>, Box<Self>),
    GreaterEquals(Box<Self>, Box<Self>),
    Smaller(Box<Self>, Box<Self>),
    SmallerEquals(Box<Self>, Box<Self>),

    /// Inclusive range check; any null operand yields false.
    Between {
        min: Box<Self>,
        max: Box<Self>,
        value: Box<Self>,
    },

    /// `needle` is contained in the list-valued `haystack` (renders as IN).
    OneOf {
        haystack: Box<Self>,
        needle: Box<Self>,
    },
    /// Mirror of `OneOf` for collection-valued properties (renders as
    /// MEMBER OF). Kept distinct because the two directions need different
    /// generated SQL.
    MemberOf {
        needle: Box<Self>,
        haystack: Box<Self>,
    },

    /// Numeric addition over two or more children.
    Sum(Vec<Self>),
    /// Numeric multiplication over two or more children.
    Product(Vec<Self>),

    /// Case-insensitive substring test; null operand yields false.
    StringContains {
        haystack: Box<Self>,
        needle: Box<Self>,
    },
    /// Case-insensitive prefix test; empty needle yields true.
    StartsWith {
        haystack: Box<Self>,
        needle: Box<Self>,
    },
    /// Case-insensitive suffix test; empty needle yields true.
    EndsWith {
        haystack: Box<Self>,
        needle: Box<Self>,
    },

    IsNull(Box<Self>),
    /// Lower-cases text; non-text input yields null.
    Lower(Box<Self>),
    /// Upper-cases text; non-text input yields null.
    Upper(Box<Self>),
    /// Element count of a list-valued child.
    Size(Box<Self>),
}

impl Expr {
    ///
    /// CONSTRUCTION
    ///

    pub fn value(value: impl IntoValue) -> Self {
        Self::Value(value.into_value())
    }

    #[must_use]
    pub const fn property(path: PropertyPath) -> Self {
        Self::Property(path)
    }

    pub fn all_true(children: Vec<Self>) -> Result<Self, EvalError> {
        check_arity("allTrue", &children, 1)?;
        Ok(Self::AllTrue(children))
    }

    pub fn any_true(children: Vec<Self>) -> Result<Self, EvalError> {
        check_arity("anyTrue", &children, 1)?;
        Ok(Self::AnyTrue(children))
    }

    pub fn all_equal(children: Vec<Self>) -> Result<Self, EvalError> {
        check_arity("allEqual", &children, 2)?;
        Ok(Self::AllEqual(children))
    }

    pub fn any_equal(children: Vec<Self>) -> Result<Self, EvalError> {
        check_arity("anyEqual", &children, 2)?;
        Ok(Self::AnyEqual(children))
    }

    pub fn sum(children: Vec<Self>) -> Result<Self, EvalError> {
        check_arity("sum", &children, 2)?;
        Ok(Self::Sum(children))
    }

    pub fn product(children: Vec<Self>) -> Result<Self, EvalError> {
        check_arity("product", &children, 2)?;
        Ok(Self::Product(children))
    }

    /// Combine two conditions into a conjunction, flattening nested `AllTrue`
    /// children to avoid deep nesting.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::AllTrue(mut a), Self::AllTrue(mut b)) => {
                a.append(&mut b);
                Self::AllTrue(a)
            }
            (Self::AllTrue(mut a), b) => {
                a.push(b);
                Self::AllTrue(a)
            }
            (a, Self::AllTrue(mut b)) => {
                let mut list = vec![a];
                list.append(&mut b);
                Self::AllTrue(list)
            }
            (a, b) => Self::AllTrue(vec![a, b]),
        }
    }

    /// Combine two conditions into a disjunction, flattening nested `AnyTrue`
    /// children similarly to `and`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::AnyTrue(mut a), Self::AnyTrue(mut b)) => {
                a.append(&mut b);
                Self::AnyTrue(a)
            }
            (Self::AnyTrue(mut a), b) => {
                a.push(b);
                Self::AnyTrue(a)
            }
            (a, Self::AnyTrue(mut b)) => {
                let mut list = vec![a];
                list.append(&mut b);
                Self::AnyTrue(list)
            }
            (a, b) => Self::AnyTrue(vec![a, b]),
        }
    }

    /// Negate this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    ///
    /// STRUCTURE
    ///

    /// Number of row positions this expression consumes.
    #[must_use]
    pub fn path_count(&self) -> usize {
        match self {
            Self::Value(_) => 0,
            Self::Property(_) => 1,
            _ => self.children().iter().map(|child| child.path_count()).sum(),
        }
    }

    /// Declared property paths in row order.
    #[must_use]
    pub fn paths(&self) -> Vec<&PropertyPath> {
        let mut paths = Vec::with_capacity(self.path_count());
        self.collect_paths(&mut paths);
        paths
    }

    fn collect_paths<'e>(&'e self, into: &mut Vec<&'e PropertyPath>) {
        match self {
            Self::Value(_) => {}
            Self::Property(path) => into.push(path),
            _ => {
                for child in self.children() {
                    child.collect_paths(into);
                }
            }
        }
    }

    /// Rewrite every contained property path in place (path aliasing).
    ///
    /// This is the one mutation point of the model; it must run before any
    /// evaluation or rendering that uses the rewritten paths.
    pub fn rewrite_paths<F>(&mut self, rewrite: &mut F)
    where
        F: FnMut(&mut PropertyPath),
    {
        match self {
            Self::Value(_) => {}
            Self::Property(path) => rewrite(path),
            _ => {
                for child in self.children_mut() {
                    child.rewrite_paths(rewrite);
                }
            }
        }
    }

    /// Child expressions in row order. Leaves have none.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Value(_) | Self::Property(_) => Vec::new(),
            Self::AllTrue(children)
            | Self::AnyTrue(children)
            | Self::AllEqual(children)
            | Self::AnyEqual(children)
            | Self::Sum(children)
            | Self::Product(children) => children.iter().collect(),
            Self::Not(child)
            | Self::IsNull(child)
            | Self::Lower(child)
            | Self::Upper(child)
            | Self::Size(child) => vec![child],
            Self::Greater(lhs, rhs)
            | Self::GreaterEquals(lhs, rhs)
            | Self::Smaller(lhs, rhs)
            | Self::SmallerEquals(lhs, rhs) => vec![lhs, rhs],
            Self::Between { min, max, value } => vec![min, max, value],
            Self::OneOf { haystack, needle } => vec![haystack, needle],
            Self::MemberOf { needle, haystack } => vec![needle, haystack],
            Self::StringContains { haystack, needle }
            | Self::StartsWith { haystack, needle }
            | Self::EndsWith { haystack, needle } => vec![haystack, needle],
        }
    }

    fn children_mut(&mut self) -> Vec<&mut Self> {
        match self {
            Self::Value(_) | Self::Property(_) => Vec::new(),
            Self::AllTrue(children)
            | Self::AnyTrue(children)
            | Self::AllEqual(children)
            | Self::AnyEqual(children)
            | Self::Sum(children)
            | Self::Product(children) => children.iter_mut().collect(),
            Self::Not(child)
            | Self::IsNull(child)
            | Self::Lower(child)
            | Self::Upper(child)
            | Self::Size(child) => vec![child],
            Self::Greater(lhs, rhs)
            | Self::GreaterEquals(lhs, rhs)
            | Self::Smaller(lhs, rhs)
            | Self::SmallerEquals(lhs, rhs) => vec![lhs, rhs],
            Self::Between { min, max, value } => vec![min, max, value],
            Self::OneOf { haystack, needle } => vec![haystack, needle],
            Self::MemberOf { needle, haystack } => vec![needle, haystack],
            Self::StringContains { haystack, needle }
            | Self::StartsWith { haystack, needle }
            | Self::EndsWith { haystack, needle } => vec![haystack, needle],
        }
    }

    ///
    /// EVALUATION
    ///

    /// Apply this expression to a row positionally aligned to `paths()`.
    pub fn apply(&self, row: &[Value]) -> Result<Value, EvalError> {
        let expected = self.path_count();
        if row.len() != expected {
            return Err(EvalError::RowWidth {
                expected,
                actual: row.len(),
            });
        }

        self.eval(row)
    }

    fn eval(&self, row: &[Value]) -> Result<Value, EvalError> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Property(_) => Ok(row[0].clone()),

            Self::AllTrue(children) => {
                check_arity("allTrue", children, 1)?;
                for (child, slice) in child_slices(children, row) {
                    if !require_bool("allTrue", &child.eval(slice)?)? {
                        return Ok(Value::Bool(false));
                    }
                }
                Ok(Value::Bool(true))
            }
            Self::AnyTrue(children) => {
                check_arity("anyTrue", children, 1)?;
                for (child, slice) in child_slices(children, row) {
                    if require_bool("anyTrue", &child.eval(slice)?)? {
                        return Ok(Value::Bool(true));
                    }
                }
                Ok(Value::Bool(false))
            }
            Self::Not(child) => {
                let value = child.eval(row)?;
                Ok(Value::Bool(!require_bool("not", &value)?))
            }

            Self::AllEqual(children) => {
                check_arity("allEqual", children, 2)?;
                let values = eval_children(children, row)?;
                if values.iter().any(Value::is_null) {
                    return Ok(Value::Bool(false));
                }
                let first = &values[0];
                Ok(Value::Bool(values[1..].iter().all(|v| v.eq_coerced(first))))
            }
            Self::AnyEqual(children) => {
                check_arity("anyEqual", children, 2)?;
                let values = eval_children(children, row)?;
                for (index, left) in values.iter().enumerate() {
                    if left.is_null() {
                        continue;
                    }
                    for right in &values[index + 1..] {
                        if !right.is_null() && left.eq_coerced(right) {
                            return Ok(Value::Bool(true));
                        }
                    }
                }
                Ok(Value::Bool(false))
            }

            Self::Greater(lhs, rhs) => compare(lhs, rhs, row, "greater", Ordering::is_gt),
            Self::GreaterEquals(lhs, rhs) => {
                compare(lhs, rhs, row, "greaterEquals", Ordering::is_ge)
            }
            Self::Smaller(lhs, rhs) => compare(lhs, rhs, row, "smaller", Ordering::is_lt),
            Self::SmallerEquals(lhs, rhs) => {
                compare(lhs, rhs, row, "smallerEquals", Ordering::is_le)
            }

            Self::Between { min, max, value } => {
                let [min, max, value] = eval_three([min, max, value], row)?;
                if min.is_null() || max.is_null() || value.is_null() {
                    return Ok(Value::Bool(false));
                }
                let lower = ordered("between", &min, &value)?;
                let upper = ordered("between", &value, &max)?;
                Ok(Value::Bool(lower.is_le() && upper.is_le()))
            }

            Self::OneOf { haystack, needle } => {
                let [haystack, needle] = eval_two([haystack, needle], row)?;
                contains("oneOf", &haystack, &needle)
            }
            Self::MemberOf { needle, haystack } => {
                let [needle, haystack] = eval_two([needle, haystack], row)?;
                contains("memberOf", &haystack, &needle)
            }

            Self::Sum(children) => {
                check_arity("sum", children, 2)?;
                let values = eval_children(children, row)?;
                numeric_fold("sum", &values, 0, i128::checked_add, |a, b| a + b)
            }
            Self::Product(children) => {
                check_arity("product", children, 2)?;
                let values = eval_children(children, row)?;
                numeric_fold("product", &values, 1, i128::checked_mul, |a, b| a * b)
            }

            Self::StringContains { haystack, needle } => {
                text_predicate("stringContains", haystack, needle, row, Value::text_contains)
            }
            Self::StartsWith { haystack, needle } => {
                text_predicate("startsWith", haystack, needle, row, Value::text_starts_with)
            }
            Self::EndsWith { haystack, needle } => {
                text_predicate("endsWith", haystack, needle, row, Value::text_ends_with)
            }

            Self::IsNull(child) => Ok(Value::Bool(child.eval(row)?.is_null())),
            Self::Lower(child) => Ok(text_transform(&child.eval(row)?, str::to_lowercase)),
            Self::Upper(child) => Ok(text_transform(&child.eval(row)?, str::to_uppercase)),
            Self::Size(child) => {
                let value = child.eval(row)?;
                let items = value.as_list().ok_or(EvalError::OperandType {
                    function: "size",
                    variant: value.variant_name(),
                })?;
                Ok(Value::Uint(items.len() as u64))
            }
        }
    }
}

///
/// Row slicing
///
/// Splits a flat positional list into contiguous per-child slices sized by
/// each child's own path count. The SQL renderer partitions its alias list
/// with this same helper so both interpreters stay aligned.
///

pub(crate) fn child_slices<'e, 'a, T>(
    children: &'e [Expr],
    items: &'a [T],
) -> impl Iterator<Item = (&'e Expr, &'a [T])> {
    let mut offset = 0;
    children.iter().map(move |child| {
        let count = child.path_count();
        let slice = &items[offset..offset + count];
        offset += count;
        (child, slice)
    })
}

pub(crate) fn check_arity(
    function: &'static str,
    children: &[Expr],
    minimum: usize,
) -> Result<(), EvalError> {
    if children.len() < minimum {
        return Err(EvalError::Arity {
            function,
            minimum,
            actual: children.len(),
        });
    }

    Ok(())
}

fn eval_children(children: &[Expr], row: &[Value]) -> Result<Vec<Value>, EvalError> {
    child_slices(children, row)
        .map(|(child, slice)| child.eval(slice))
        .collect()
}

fn eval_two(children: [&Expr; 2], row: &[Value]) -> Result<[Value; 2], EvalError> {
    let split = children[0].path_count();
    Ok([
        children[0].eval(&row[..split])?,
        children[1].eval(&row[split..])?,
    ])
}

fn eval_three(children: [&Expr; 3], row: &[Value]) -> Result<[Value; 3], EvalError> {
    let first = children[0].path_count();
    let second = first + children[1].path_count();
    Ok([
        children[0].eval(&row[..first])?,
        children[1].eval(&row[first..second])?,
        children[2].eval(&row[second..])?,
    ])
}

fn require_bool(function: &'static str, value: &Value) -> Result<bool, EvalError> {
    value.as_bool().ok_or(EvalError::OperandType {
        function,
        variant: value.variant_name(),
    })
}

// Ordering comparison; null operands yield false (SQL semantics), anything
// else incomparable is a typed error.
fn compare(
    lhs: &Expr,
    rhs: &Expr,
    row: &[Value],
    function: &'static str,
    accept: impl Fn(Ordering) -> bool,
) -> Result<Value, EvalError> {
    let [lhs, rhs] = eval_two([lhs, rhs], row)?;
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Bool(false));
    }

    Ok(Value::Bool(accept(ordered(function, &lhs, &rhs)?)))
}

fn ordered(function: &'static str, lhs: &Value, rhs: &Value) -> Result<Ordering, EvalError> {
    lhs.order_cmp(rhs).ok_or(EvalError::OperandType {
        function,
        variant: if lhs.order_cmp(lhs).is_none() {
            lhs.variant_name()
        } else {
            rhs.variant_name()
        },
    })
}

// Shared membership body for OneOf/MemberOf. A null haystack or needle yields
// false; a non-list haystack is a typed error.
fn contains(function: &'static str, haystack: &Value, needle: &Value) -> Result<Value, EvalError> {
    if haystack.is_null() || needle.is_null() {
        return Ok(Value::Bool(false));
    }
    let items = haystack.as_list().ok_or(EvalError::OperandType {
        function,
        variant: haystack.variant_name(),
    })?;

    Ok(Value::Bool(items.iter().any(|item| item.eq_coerced(needle))))
}

// Integer folds stay exact via i128 and overflow loudly; any float operand
// switches the whole fold to f64.
#[allow(clippy::cast_precision_loss)]
fn numeric_fold(
    function: &'static str,
    values: &[Value],
    identity: i128,
    int_op: impl Fn(i128, i128) -> Option<i128>,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    for value in values {
        if !value.is_numeric() {
            return Err(EvalError::OperandType {
                function,
                variant: value.variant_name(),
            });
        }
    }

    if values.iter().any(|v| matches!(v, Value::Float(_))) {
        let result = values
            .iter()
            .map(float_value)
            .fold(identity as f64, float_op);
        return Ok(Value::Float(result));
    }

    let mut acc = identity;
    for value in values {
        let operand = match value {
            Value::Int(i) => i128::from(*i),
            Value::Uint(u) => i128::from(*u),
            _ => unreachable!("checked numeric above"),
        };
        acc = int_op(acc, operand).ok_or(EvalError::NumericOverflow { function })?;
    }

    if let Ok(int) = i64::try_from(acc) {
        Ok(Value::Int(int))
    } else if let Ok(uint) = u64::try_from(acc) {
        Ok(Value::Uint(uint))
    } else {
        Err(EvalError::NumericOverflow { function })
    }
}

#[allow(clippy::cast_precision_loss)]
fn float_value(value: &Value) -> f64 {
    match value {
        Value::Float(f) => *f,
        Value::Int(i) => *i as f64,
        Value::Uint(u) => *u as f64,
        _ => f64::NAN,
    }
}

// Case-insensitive text predicate; null operands yield false, non-text
// non-null operands are a typed error.
fn text_predicate(
    function: &'static str,
    haystack: &Expr,
    needle: &Expr,
    row: &[Value],
    op: impl Fn(&Value, &Value, TextMode) -> Option<bool>,
) -> Result<Value, EvalError> {
    let [haystack, needle] = eval_two([haystack, needle], row)?;
    if haystack.is_null() || needle.is_null() {
        return Ok(Value::Bool(false));
    }

    match op(&haystack, &needle, TextMode::Ci) {
        Some(result) => Ok(Value::Bool(result)),
        None => Err(EvalError::OperandType {
            function,
            variant: if haystack.is_text() {
                needle.variant_name()
            } else {
                haystack.variant_name()
            },
        }),
    }
}

fn text_transform(value: &Value, transform: impl Fn(&str) -> String) -> Value {
    value
        .as_text()
        .map_or(Value::Null, |text| Value::Text(transform(text)))
}

///
/// Bit Operations
/// allow us to combine conditions with | and &
///

impl BitAnd for Expr {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for Expr {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl Not for Expr {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}
