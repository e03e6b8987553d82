//! Core traits for the filtering pipeline.
//!
//! This module defines the RowFilter trait that allows composable,
//! reusable row filters to be applied to relations.

use data_loader::{Relation, RelationResult};

/// Core trait for restricting the rows of a relation.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` lets a configured filter be shared by reference
/// - Filters take ownership of the relation and return the kept rows,
///   in their original order
pub trait RowFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a relation.
    ///
    /// # Returns
    /// * `Ok(Relation)` - The rows that passed, possibly none
    /// * `Err(KeyError)` - If the filter refers to a column the relation lacks
    fn apply(&self, relation: Relation) -> RelationResult<Relation>;
}
