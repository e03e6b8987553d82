//! The top-N selection that later stages use as a membership set.

use crate::aggregate::{SIZE_COLUMN, size_by};
use crate::filters::MembershipFilter;
use crate::sort::top_n;
use data_loader::{Relation, RelationResult, Value};
use std::collections::HashSet;

/// Up to N `(key, count)` pairs, largest count first.
///
/// Ties keep the order of the input relation. The counts are kept for
/// display only; downstream code uses the keys.
#[derive(Debug, Clone, PartialEq)]
pub struct TopNSet {
    key_column: String,
    entries: Vec<(Value, Value)>,
}

impl TopNSet {
    /// Take the `n` rows of `counts` with the largest `count_column`
    pub fn from_counts(
        counts: &Relation,
        key_column: &str,
        count_column: &str,
        n: usize,
    ) -> RelationResult<Self> {
        let top = top_n(counts, count_column, n)?;
        let key = top.column_index(key_column)?;
        let count = top.column_index(count_column)?;
        Ok(Self {
            key_column: key_column.to_string(),
            entries: top
                .rows()
                .iter()
                .map(|row| (row[key].clone(), row[count].clone()))
                .collect(),
        })
    }

    /// The `n` most frequent values of `key_column` in `relation`
    pub fn most_frequent(relation: &Relation, key_column: &str, n: usize) -> RelationResult<Self> {
        let sizes = size_by(relation, &[key_column])?;
        Self::from_counts(&sizes, key_column, SIZE_COLUMN, n)
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in rank order
    pub fn keys(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn contains(&self, key: &Value) -> bool {
        self.keys().any(|k| k == key)
    }

    pub fn key_set(&self) -> HashSet<Value> {
        self.keys().cloned().collect()
    }

    /// Membership filter over the same key column, dropping the counts
    pub fn into_filter(self) -> MembershipFilter {
        MembershipFilter::new(
            &self.key_column,
            self.entries.into_iter().map(|(key, _)| key),
        )
    }
}
