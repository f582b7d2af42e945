use crate::{
    access::PropertyAccessor,
    path::{PathError, PropertyPath},
    value::Value,
};
use derive_more::{Deref, DerefMut, IntoIterator};
use std::collections::HashMap;

///
/// Row
///
/// One row of the joined value table, positionally aligned to the path list
/// the table was built from.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, IntoIterator, PartialEq)]
pub struct Row(Vec<Value>);

impl Row {
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

///
/// TableJoiner
///
/// Builds the cartesian value table an expression is applied against,
/// emulating the row fan-out a relational join over to-many relationships
/// would produce.
///
/// Structurally equal paths (segments, depth, salt and context all equal)
/// resolve once and share a column; salted copies stay distinct. A path that
/// resolves to no values contributes a single `Null` so its rows still exist.
///

#[derive(Clone, Copy, Debug)]
pub struct TableJoiner<A> {
    accessor: A,
}

impl<A> TableJoiner<A> {
    pub const fn new(accessor: A) -> Self {
        Self { accessor }
    }

    /// Resolve `paths` against `root` and return the full cartesian product,
    /// rightmost column varying fastest.
    ///
    /// Zero paths yield one empty row so constant expressions still apply.
    /// Row count is the product of the unique non-empty column cardinalities;
    /// row width always equals `paths.len()`.
    pub fn value_rows<E>(&self, root: &E, paths: &[&PropertyPath]) -> Result<Vec<Row>, PathError>
    where
        A: PropertyAccessor<E>,
    {
        if paths.is_empty() {
            return Ok(vec![Row::new(Vec::new())]);
        }

        // Dedup pass: later occurrences of an equal path become back
        // references to the first occurrence's column.
        let mut unique: Vec<&PropertyPath> = Vec::new();
        let mut column_of: Vec<usize> = Vec::with_capacity(paths.len());
        let mut seen: HashMap<&PropertyPath, usize> = HashMap::new();
        for &path in paths {
            let index = *seen.entry(path).or_insert_with(|| {
                unique.push(path);
                unique.len() - 1
            });
            column_of.push(index);
        }

        let mut columns: Vec<Vec<Value>> = Vec::with_capacity(unique.len());
        for path in &unique {
            let mut values =
                self.accessor
                    .values_by_path(root, path.access_depth(), path.segments())?;
            if values.is_empty() {
                values.push(Value::Null);
            }
            columns.push(values);
        }

        // Cartesian product over the unique columns.
        let mut product: Vec<Vec<usize>> = vec![Vec::with_capacity(columns.len())];
        for column in &columns {
            let mut next = Vec::with_capacity(product.len() * column.len());
            for combo in &product {
                for value_index in 0..column.len() {
                    let mut extended = combo.clone();
                    extended.push(value_index);
                    next.push(extended);
                }
            }
            product = next;
        }

        let rows: Vec<Row> = product
            .into_iter()
            .map(|combo| {
                Row::new(
                    column_of
                        .iter()
                        .map(|&column| columns[column][combo[column]].clone())
                        .collect(),
                )
            })
            .collect();

        log::trace!(
            "joined {} paths ({} unique) into {} rows",
            paths.len(),
            unique.len(),
            rows.len()
        );

        Ok(rows)
    }
}

///
/// TESTS
///
