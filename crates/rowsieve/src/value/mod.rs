mod compare;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub use compare::{canonical_cmp, eq_coerced, order_cmp};

///
/// TextMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextMode {
    Cs, // case-sensitive
    Ci, // case-insensitive
}

///
/// Value
///
/// Closed scalar/collection model shared by the in-memory evaluator and the
/// SQL renderer.
///
/// Null → the property resolved to nothing (absent to-one, SQL NULL).
/// List → many-cardinality transport; element order is preserved.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Float(f64),
    Int(i64),
    List(Vec<Self>),
    #[default]
    Null,
    Text(String),
    Uint(u64),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from owned items.
    ///
    /// This is the canonical constructor for condition/factory boundaries.
    pub fn from_list<T>(items: Vec<T>) -> Self
    where
        T: IntoValue,
    {
        Self::List(items.into_iter().map(IntoValue::into_value).collect())
    }

    /// Build a `Value::List` from a list literal.
    ///
    /// Intended for tests and inline construction.
    pub fn from_slice<T>(items: &[T]) -> Self
    where
        T: IntoValue + Clone,
    {
        Self::List(items.iter().cloned().map(IntoValue::into_value).collect())
    }

    ///
    /// TYPES
    ///

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if the value is one of the numeric variants supported by
    /// widened comparison and arithmetic.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Uint(_) | Self::Float(_))
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Stable variant name used in error diagnostics.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::List(_) => "list",
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Uint(_) => "uint",
        }
    }

    ///
    /// CONVERSION
    ///

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(xs) = self {
            Some(xs.as_slice())
        } else {
            None
        }
    }

    ///
    /// COMPARISON
    ///

    /// Equality with numeric widening across the integer/float variants.
    ///
    /// Mismatched non-numeric variants are simply unequal.
    #[must_use]
    pub fn eq_coerced(&self, other: &Self) -> bool {
        compare::eq_coerced(self, other)
    }

    /// Partial ordering with numeric widening.
    ///
    /// Returns `None` for incomparable variant pairs (including any `Null`
    /// operand and lists).
    #[must_use]
    pub fn order_cmp(&self, other: &Self) -> Option<Ordering> {
        compare::order_cmp(self, other)
    }

    /// Total canonical comparator used by sort surfaces.
    ///
    /// Mixed-variant comparisons fall back to a stable variant rank so the
    /// ordering is deterministic for arbitrary key mixtures.
    #[must_use]
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        compare::canonical_cmp(self, other)
    }

    ///
    /// TEXT
    ///

    /// Substring containment; `None` when either side is not text.
    #[must_use]
    pub fn text_contains(&self, needle: &Self, mode: TextMode) -> Option<bool> {
        compare::text_op(self, needle, mode, |hay, needle| hay.contains(needle))
    }

    /// Prefix test; `None` when either side is not text.
    #[must_use]
    pub fn text_starts_with(&self, needle: &Self, mode: TextMode) -> Option<bool> {
        compare::text_op(self, needle, mode, |hay, needle| hay.starts_with(needle))
    }

    /// Suffix test; `None` when either side is not text.
    #[must_use]
    pub fn text_ends_with(&self, needle: &Self, mode: TextMode) -> Option<bool> {
        compare::text_op(self, needle, mode, |hay, needle| hay.ends_with(needle))
    }
}

///
/// IntoValue
///
/// Ergonomic conversion surface for condition factories and test fixtures.
///

pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for u64 {
    fn into_value(self) -> Value {
        Value::Uint(self)
    }
}

impl IntoValue for u32 {
    fn into_value(self) -> Value {
        Value::Uint(u64::from(self))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::from_list(self)
    }
}
