//! Relational operations over `data_loader::Relation`.
//!
//! This crate provides:
//! - Joins on equal keys (`join`)
//! - Group-by aggregation with count, mean and sum (`aggregate`)
//! - Stable sorting and top-N selection (`sort`, `top_set`)
//! - Unstack, stack and pivot tables with derived columns (`reshape`)
//! - Binning and histograms (`bucket`)
//! - The RowFilter trait, concrete filters and FilterPipeline for composing them
//!
//! ## Architecture
//! Every operation is a function from input relation(s) and parameters to a
//! new relation. Nothing is mutated behind the caller's back, so an
//! intermediate result can be reused by any number of later stages.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::prelude::*;
//!
//! let lens = natural_join(&natural_join(&movies, &ratings)?, &users)?;
//! let stats = group_by(&lens, &["title"], &AggSpec::many("rating", &[AggFunc::Count, AggFunc::Mean]))?;
//! let popular = FilterPipeline::new()
//!     .add_filter(MinimumCountFilter::new("rating_count", 100.0))
//!     .apply(stats)?;
//! let best = top_n(&popular, "rating_mean", 15)?;
//! ```

pub mod aggregate;
pub mod bucket;
pub mod filter_pipeline;
pub mod filters;
pub mod join;
pub mod reshape;
pub mod sort;
pub mod top_set;
pub mod traits;

// Re-export main types
pub use aggregate::{AggFunc, AggSpec, Aggregator, SIZE_COLUMN, group_by, size_by, value_counts};
pub use bucket::{Bins, HistogramBin, cut, cut_in_place, histogram, histogram_column};
pub use filter_pipeline::FilterPipeline;
pub use join::{inner_join, natural_join};
pub use reshape::{column_keys, difference, pivot_table, stack, stack_with_keys, unstack};
pub use sort::{SortKey, SortOrder, sort_by, top_n};
pub use top_set::TopNSet;
pub use traits::RowFilter;

/// Everything needed to write a query in one import
pub mod prelude {
    pub use crate::aggregate::{AggFunc, AggSpec, group_by, size_by, value_counts};
    pub use crate::bucket::{Bins, HistogramBin, cut, cut_in_place, histogram, histogram_column};
    pub use crate::filter_pipeline::FilterPipeline;
    pub use crate::filters::{ColumnPredicateFilter, MembershipFilter, MinimumCountFilter, filter_in};
    pub use crate::join::{inner_join, natural_join};
    pub use crate::reshape::{column_keys, difference, pivot_table, stack, stack_with_keys, unstack};
    pub use crate::sort::{SortKey, sort_by, top_n};
    pub use crate::top_set::TopNSet;
    pub use crate::traits::RowFilter;
    pub use data_loader::{Relation, RelationError, RelationResult, Value};
}
