//! Filter on an arbitrary test of one column's value.

use crate::traits::RowFilter;
use data_loader::{Relation, RelationResult, Value};

type Predicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// Keeps rows where `predicate(row[column])` holds.
pub struct ColumnPredicateFilter {
    name: String,
    column: String,
    predicate: Predicate,
}

impl ColumnPredicateFilter {
    pub fn new(
        name: &str,
        column: &str,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            column: column.to_string(),
            predicate: Box::new(predicate),
        }
    }
}

impl RowFilter for ColumnPredicateFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, relation: Relation) -> RelationResult<Relation> {
        let idx = relation.column_index(&self.column)?;
        Ok(relation.filter(|row| (self.predicate)(&row.values()[idx])))
    }
}
