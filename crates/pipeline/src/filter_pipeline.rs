//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple row filters together using the builder pattern.

use crate::traits::RowFilter;
use data_loader::{Relation, RelationResult};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(MinimumCountFilter::new("rating_count", 100.0))
///     .add_filter(MembershipFilter::new("movie_id", top_movies.keys().cloned()));
///
/// let filtered = pipeline.apply(stats)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn RowFilter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl RowFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence.
    ///
    /// An empty intermediate result is not an error: it is logged as a
    /// warning and passed on, so later filters see an empty relation.
    pub fn apply(&self, relation: Relation) -> RelationResult<Relation> {
        let mut current = relation;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
            if current.is_empty() {
                tracing::warn!("Filter {} left no rows", filter.name());
            }
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
