use crate::{
    access::PropertyAccessor,
    error::QueryError,
    expr::{EvalError, Expr},
    join::TableJoiner,
};

///
/// ConditionEvaluator
///
/// Applies boolean conditions to in-memory entities through the joined value
/// table.
///
/// Evaluation is existential: a condition holds for an entity iff at least
/// one row of the entity's value table satisfies it. The inverted form is the
/// independent existential check that some row falsifies the condition, so
/// under to-many fan-out both can hold for the same entity at once.
///

#[derive(Clone, Copy, Debug)]
pub struct ConditionEvaluator<A> {
    joiner: TableJoiner<A>,
}

impl<A> ConditionEvaluator<A> {
    pub const fn new(accessor: A) -> Self {
        Self {
            joiner: TableJoiner::new(accessor),
        }
    }

    /// True iff some row of the entity's value table satisfies `condition`.
    pub fn evaluate<E>(&self, root: &E, condition: &Expr) -> Result<bool, QueryError>
    where
        A: PropertyAccessor<E>,
    {
        self.search(root, condition, true)
    }

    /// True iff some row of the entity's value table falsifies `condition`.
    ///
    /// Not the negation of [`evaluate`](Self::evaluate).
    pub fn evaluate_inverted<E>(&self, root: &E, condition: &Expr) -> Result<bool, QueryError>
    where
        A: PropertyAccessor<E>,
    {
        self.search(root, condition, false)
    }

    /// [`evaluate`](Self::evaluate) over an optional root; an absent root
    /// satisfies nothing.
    pub fn evaluate_opt<E>(&self, root: Option<&E>, condition: &Expr) -> Result<bool, QueryError>
    where
        A: PropertyAccessor<E>,
    {
        root.map_or(Ok(false), |root| self.evaluate(root, condition))
    }

    /// Keep the entities satisfying every condition, preserving relative
    /// order. An empty condition list keeps everything.
    pub fn filter<E>(&self, entities: Vec<E>, conditions: &[Expr]) -> Result<Vec<E>, QueryError>
    where
        A: PropertyAccessor<E>,
    {
        if conditions.is_empty() {
            return Ok(entities);
        }

        log::debug!(
            "filtering {} entities through {} conditions",
            entities.len(),
            conditions.len()
        );

        let mut kept = Vec::with_capacity(entities.len());
        for entity in entities {
            let mut matches = true;
            for condition in conditions {
                if !self.evaluate(&entity, condition)? {
                    matches = false;
                    break;
                }
            }
            if matches {
                kept.push(entity);
            }
        }

        Ok(kept)
    }

    fn search<E>(&self, root: &E, condition: &Expr, target: bool) -> Result<bool, QueryError>
    where
        A: PropertyAccessor<E>,
    {
        let paths = condition.paths();
        let rows = self.joiner.value_rows(root, &paths)?;

        for row in &rows {
            let value = condition.apply(row)?;
            let satisfied = value.as_bool().ok_or(EvalError::OperandType {
                function: "evaluate",
                variant: value.variant_name(),
            })?;
            if satisfied == target {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

///
/// TESTS
///
