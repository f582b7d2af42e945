use crate::{expr::EvalError, path::PathError, sort::SortError, sql::RenderError};
use thiserror::Error as ThisError;

///
/// QueryError
///
/// Umbrella over the module-level error types, returned by the composition
/// surfaces (evaluator, reindexer). The module errors stay public so callers
/// working a single layer keep the narrow type.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum QueryError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
