use crate::{
    access::PropertyAccessor,
    join::TableJoiner,
    path::{PathError, PropertyPath},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error as ThisError;

///
/// Direction
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Asc)
    }
}

///
/// SortMethod
///
/// One ordering criterion: a single property path and a direction. The path
/// must resolve to exactly one value per entity.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SortMethod {
    path: PropertyPath,
    direction: Direction,
}

impl SortMethod {
    #[must_use]
    pub const fn new(path: PropertyPath, direction: Direction) -> Self {
        Self { path, direction }
    }

    #[must_use]
    pub const fn path(&self) -> &PropertyPath {
        &self.path
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

/// Sort ascending by the given property.
#[must_use]
pub const fn ascending(path: PropertyPath) -> SortMethod {
    SortMethod::new(path, Direction::Asc)
}

/// Sort descending by the given property.
#[must_use]
pub const fn descending(path: PropertyPath) -> SortMethod {
    SortMethod::new(path, Direction::Desc)
}

///
/// SortError
///

#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("failed to sort {entity_count} entities by [{}]", describe(sort_methods))]
pub struct SortError {
    pub entity_count: usize,
    pub sort_methods: Vec<SortMethod>,
    #[source]
    pub source: SortFailure,
}

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum SortFailure {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("sort key `{path}` resolved to {rows} rows; need exactly one value")]
    AmbiguousKey { path: String, rows: usize },
}

fn describe(methods: &[SortMethod]) -> String {
    methods
        .iter()
        .map(|method| {
            let arrow = if method.direction().is_ascending() {
                "asc"
            } else {
                "desc"
            };
            format!("{} {arrow}", method.path().dotted())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

///
/// Sorter
///
/// Stable multi-key entity sort. Keys are resolved up front through the same
/// join machinery the evaluator uses, then compared with the total canonical
/// comparator; equal keys keep their input order.
///

#[derive(Clone, Copy, Debug)]
pub struct Sorter<A> {
    joiner: TableJoiner<A>,
}

impl<A> Sorter<A> {
    pub const fn new(accessor: A) -> Self {
        Self {
            joiner: TableJoiner::new(accessor),
        }
    }

    /// Sort `entities` by the given methods, earlier methods taking
    /// precedence. An empty method list is the identity.
    pub fn sort<E>(
        &self,
        entities: Vec<E>,
        sort_methods: &[SortMethod],
    ) -> Result<Vec<E>, SortError>
    where
        A: PropertyAccessor<E>,
    {
        if sort_methods.is_empty() || entities.len() < 2 {
            return Ok(entities);
        }

        let entity_count = entities.len();
        log::debug!("sorting {entity_count} entities by {} methods", sort_methods.len());

        let mut keyed: Vec<(Vec<Value>, E)> = Vec::with_capacity(entity_count);
        for entity in entities {
            let keys = sort_methods
                .iter()
                .map(|method| self.key(&entity, method))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| SortError {
                    entity_count,
                    sort_methods: sort_methods.to_vec(),
                    source,
                })?;
            keyed.push((keys, entity));
        }

        keyed.sort_by(|(left, _), (right, _)| {
            for (method, (a, b)) in sort_methods.iter().zip(left.iter().zip(right.iter())) {
                let mut ordering = a.canonical_cmp(b);
                if !method.direction().is_ascending() {
                    ordering = ordering.reverse();
                }
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        Ok(keyed.into_iter().map(|(_, entity)| entity).collect())
    }

    // One key per entity per method; an absent value arrives as null and
    // sorts first under the canonical order.
    fn key<E>(&self, entity: &E, method: &SortMethod) -> Result<Value, SortFailure>
    where
        A: PropertyAccessor<E>,
    {
        let rows = self.joiner.value_rows(entity, &[method.path()])?;
        if rows.len() != 1 {
            return Err(SortFailure::AmbiguousKey {
                path: method.path().dotted(),
                rows: rows.len(),
            });
        }

        let mut row = rows.into_iter().next().unwrap_or_default().into_values();
        Ok(row.pop().unwrap_or(Value::Null))
    }
}

///
/// TESTS
///
