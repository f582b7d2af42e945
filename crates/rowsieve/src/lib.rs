//! Property-path condition and sort engine: one expression model evaluated
//! in memory over joined value tables or rendered into parameterized SQL
//! fragments, plus the filter/sort ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

pub mod access;
pub mod error;
pub mod eval;
pub mod expr;
pub mod join;
pub mod path;
pub mod reindex;
pub mod sort;
pub mod sql;
pub mod value;


///
/// Prelude
///
/// Prelude contains the domain vocabulary: the expression model, its
/// factories, paths, sort methods, and the evaluation surfaces.
///

pub mod prelude {
    pub use crate::{
        access::{JsonAccessor, PropertyAccessor},
        error::QueryError,
        eval::ConditionEvaluator,
        expr::{factory::*, Expr},
        join::TableJoiner,
        path::PropertyPath,
        reindex::Reindexer,
        sort::{ascending, descending, Direction, SortMethod, Sorter},
        sql::{render_condition, render_order_by, JoinResolver, SqlClause},
        value::{IntoValue, Value},
    };
}
