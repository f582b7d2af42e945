use crate::{
    access::PropertyAccessor, error::QueryError, eval::ConditionEvaluator, expr::Expr,
    sort::{SortMethod, Sorter},
};

///
/// Reindexer
///
/// Filter-then-sort composition point for in-memory entity lists.
///

#[derive(Clone, Copy, Debug)]
pub struct Reindexer<A> {
    evaluator: ConditionEvaluator<A>,
    sorter: Sorter<A>,
}

impl<A: Clone> Reindexer<A> {
    pub fn new(accessor: A) -> Self {
        Self {
            evaluator: ConditionEvaluator::new(accessor.clone()),
            sorter: Sorter::new(accessor),
        }
    }
}

impl<A> Reindexer<A> {
    /// Keep the entities matching every condition, then sort the survivors.
    /// Empty condition and method lists are the identity.
    pub fn reindex<E>(
        &self,
        entities: Vec<E>,
        conditions: &[Expr],
        sort_methods: &[SortMethod],
    ) -> Result<Vec<E>, QueryError>
    where
        A: PropertyAccessor<E>,
    {
        let filtered = self.evaluator.filter(entities, conditions)?;
        let sorted = self.sorter.sort(filtered, sort_methods)?;

        Ok(sorted)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{access::JsonAccessor, expr::factory::*, path::PropertyPath, sort::ascending};
    use serde_json::json;

    fn path(segments: &[&str]) -> PropertyPath {
        PropertyPath::new(segments.iter().copied()).unwrap()
    }

    #[test]
    fn filters_then_sorts() {
        let entities = vec![
            json!({ "name": "c", "age": 35 }),
            json!({ "name": "a", "age": 10 }),
            json!({ "name": "b", "age": 20 }),
        ];

        let reindexer = Reindexer::new(JsonAccessor);
        let result = reindexer
            .reindex(
                entities,
                &[property_greater_than(15i64, path(&["age"]))],
                &[ascending(path(&["name"]))],
            )
            .unwrap();

        let names: Vec<&str> = result.iter().map(|e| e["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn empty_inputs_are_identity() {
        let entities = vec![json!({ "name": "b" }), json!({ "name": "a" })];
        let reindexer = Reindexer::new(JsonAccessor);
        let result = reindexer.reindex(entities.clone(), &[], &[]).unwrap();
        assert_eq!(result, entities);
    }
}
