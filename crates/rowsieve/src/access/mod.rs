mod json;

pub use json::JsonAccessor;

use crate::{path::PathError, value::Value};

///
/// PropertyAccessor
///
/// Consumed collaborator that reads the values reachable by walking a
/// property path from a root object.
///
/// Traversal contract for a path of length `n` with access depth `d`:
///
/// - a to-many value produced by segment `i` (0-based) fans out into multiple
///   values iff `i >= n - d`;
/// - a non-fanning to-many value is only legal as the terminal value, where
///   it resolves to a single `Value::List` (the member-list case); mid-path
///   it is a typed error;
/// - a missing segment is a typed error;
/// - a null value contributes zero values (the joiner re-inserts `Null`).
///

pub trait PropertyAccessor<E> {
    fn values_by_path(
        &self,
        root: &E,
        access_depth: usize,
        segments: &[String],
    ) -> Result<Vec<Value>, PathError>;
}
