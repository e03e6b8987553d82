//! Sorting and top-N selection.
//!
//! Sorts are stable: rows that compare equal on every sort key keep their
//! input order, which for a group-by result is ascending key order.
//! Missing values always sort last, whatever the direction.

use data_loader::{Relation, RelationResult, Value};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A column to sort by and its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub order: SortOrder,
}

impl SortKey {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Descending,
        }
    }
}

fn compare(a: &Value, b: &Value, order: SortOrder) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match order {
            SortOrder::Ascending => a.cmp(b),
            SortOrder::Descending => b.cmp(a),
        },
    }
}

/// Stable sort of `relation` by `keys`, most significant key first
pub fn sort_by(relation: &Relation, keys: &[SortKey]) -> RelationResult<Relation> {
    let resolved = keys
        .iter()
        .map(|key| relation.column_index(&key.column).map(|i| (i, key.order)))
        .collect::<RelationResult<Vec<(usize, SortOrder)>>>()?;

    let mut rows: Vec<&Vec<Value>> = relation.rows().iter().collect();
    rows.sort_by(|a, b| {
        resolved
            .iter()
            .map(|&(i, order)| compare(&a[i], &b[i], order))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    relation.with_rows(rows.into_iter().cloned().collect())
}

/// The `n` rows with the largest `column` values, ties in input order
pub fn top_n(relation: &Relation, column: &str, n: usize) -> RelationResult<Relation> {
    Ok(sort_by(relation, &[SortKey::descending(column)])?.head(n))
}
