//! Filter to ensure a minimum threshold.
//!
//! Removes groups whose numeric column falls below a threshold, e.g. titles
//! with fewer than 100 ratings before ranking by average rating.

use crate::traits::RowFilter;
use data_loader::{Relation, RelationResult};

/// Keeps rows where `column >= min`.
///
/// Missing and non-numeric values never pass.
pub struct MinimumCountFilter {
    column: String,
    min: f64,
}

impl MinimumCountFilter {
    /// Create a new MinimumCountFilter.
    ///
    /// # Arguments
    /// * `column` - Numeric column to test (typically a `*_count` aggregate)
    /// * `min` - Smallest value that is kept
    pub fn new(column: &str, min: f64) -> Self {
        Self {
            column: column.to_string(),
            min,
        }
    }
}

impl RowFilter for MinimumCountFilter {
    fn name(&self) -> &str {
        "MinimumCountFilter"
    }

    fn apply(&self, relation: Relation) -> RelationResult<Relation> {
        let idx = relation.column_index(&self.column)?;
        Ok(relation.filter(|row| {
            row.values()[idx]
                .as_f64()
                .is_some_and(|v| v >= self.min)
        }))
    }
}
