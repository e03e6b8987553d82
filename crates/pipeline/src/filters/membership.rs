//! Filter to a precomputed set of keys.
//!
//! Scopes a relation down to rows whose key column value is in a set
//! computed earlier (typically the keys of a `TopNSet`), without
//! recomputing how that set was chosen.

use crate::traits::RowFilter;
use data_loader::{Relation, RelationResult, Value};
use std::collections::HashSet;

/// Keeps rows whose `column` value is one of `keys`.
pub struct MembershipFilter {
    column: String,
    keys: HashSet<Value>,
}

impl MembershipFilter {
    pub fn new(column: &str, keys: impl IntoIterator<Item = Value>) -> Self {
        Self {
            column: column.to_string(),
            keys: keys.into_iter().collect(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl RowFilter for MembershipFilter {
    fn name(&self) -> &str {
        "MembershipFilter"
    }

    fn apply(&self, relation: Relation) -> RelationResult<Relation> {
        filter_in(&relation, &self.column, &self.keys)
    }
}

/// Rows of `relation` whose `column` value is in `keys`, order preserved
pub fn filter_in(relation: &Relation, column: &str, keys: &HashSet<Value>) -> RelationResult<Relation> {
    let idx = relation.column_index(column)?;
    Ok(relation.filter(|row| keys.contains(&row.values()[idx])))
}
